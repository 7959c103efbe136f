use fnv::FnvHashSet;

use crate::moves::{Move, Moves};
use crate::solver::{Context, Failure, Stats};
use crate::state::State;

/// One node on the current DFS path.
#[derive(Debug)]
struct SearchNode {
    state: State,
    mov: Option<Move>,
    /// Index into the arena
    parent: Option<usize>,
    g: u32,
    h: u32,
}

enum Pass {
    Found(Moves),
    /// Smallest f above the bound, None if nothing was cut off
    Cutoff(Option<u32>),
}

/// Iterative deepening A*.
///
/// Each pass is a DFS over nodes with `g + h <= bound`. The next bound is the smallest `f`
/// that didn't fit. States already on the current path are skipped, nothing else is remembered
/// between nodes or passes.
pub(crate) fn search(ctx: &Context<'_>, initial: &State, stats: &mut Stats) -> Result<Moves, Failure> {
    let root_h = match ctx.evaluate(initial) {
        Some(h) => h,
        None => return Err(Failure::Exhausted),
    };

    let mut bound = root_h;
    loop {
        stats.start_round();
        match bounded_dfs(ctx, initial, root_h, bound, stats)? {
            Pass::Found(moves) => {
                debug!("Solved with bound {}, backtracking path", bound);
                return Ok(moves);
            }
            Pass::Cutoff(Some(next)) => {
                debug!(
                    "Bound {} explored {} states, next bound {}",
                    bound,
                    stats.explored_by_round().last().cloned().unwrap_or(0),
                    next
                );
                bound = next;
            }
            Pass::Cutoff(None) => {
                debug!("Nothing left under bound {}", bound);
                return Err(Failure::Exhausted);
            }
        }
    }
}

fn bounded_dfs(
    ctx: &Context<'_>,
    initial: &State,
    root_h: u32,
    bound: u32,
    stats: &mut Stats,
) -> Result<Pass, Failure> {
    // arena[i] is the i-th node on the path, children[i] are its siblings-to-be in reverse order
    let mut arena: Vec<SearchNode> = Vec::new();
    let mut children: Vec<Vec<(Move, State, u32)>> = Vec::new();
    let mut on_path = FnvHashSet::default();
    let mut next_bound: Option<u32> = None;

    let mut entering = Some(SearchNode {
        state: initial.clone(),
        mov: None,
        parent: None,
        g: 0,
        h: root_h,
    });

    loop {
        if let Some(node) = entering.take() {
            if ctx.deadline.expired() {
                debug!("Out of time with bound {}", bound);
                return Err(Failure::BudgetExceeded);
            }
            stats.add_explored();

            let f = node.g + node.h;
            if f > bound {
                next_bound = Some(next_bound.map_or(f, |b| b.min(f)));
            } else if node.state.is_solved(ctx.map) {
                arena.push(node);
                return Ok(Pass::Found(backtrack_path(&arena)));
            } else {
                on_path.insert(node.state.clone());
                let mut succs: Vec<_> = ctx
                    .successors(&node.state, stats)
                    .into_iter()
                    .filter(|(_, state, _)| !on_path.contains(state))
                    .collect();
                // stable so equal estimates keep the direction order
                succs.sort_by_key(|&(_, _, h)| h);
                succs.reverse();
                arena.push(node);
                children.push(succs);
            }
        }

        let parent = match arena.len() {
            0 => return Ok(Pass::Cutoff(next_bound)),
            len => len - 1,
        };
        match children[parent].pop() {
            Some((mov, state, h)) => {
                entering = Some(SearchNode {
                    state,
                    mov: Some(mov),
                    parent: Some(parent),
                    g: arena[parent].g + 1,
                    h,
                });
            }
            None => {
                children.pop();
                if let Some(done) = arena.pop() {
                    on_path.remove(&done.state);
                }
            }
        }
    }
}

fn backtrack_path(arena: &[SearchNode]) -> Moves {
    let mut moves = Vec::new();
    let mut cur = arena.len().checked_sub(1);
    while let Some(index) = cur {
        let node = &arena[index];
        if let Some(mov) = node.mov {
            moves.push(mov);
        }
        cur = node.parent;
    }
    moves.reverse();
    Moves::new(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::config::{Configuration, HeuristicKind, SolverKind};
    use crate::level::Level;
    use crate::Solve;

    #[test]
    fn two_boxes() {
        let level: Level = r"
#######
#  @  #
# $ $ #
# . . #
#     #
#######
"
        .parse()
        .unwrap();
        let config = Configuration::new(SolverKind::IdaStar, HeuristicKind::IdaStar);
        let result = level.solve(&config);
        let moves = result.moves.unwrap();
        assert_eq!(moves.move_cnt(), 6);
        assert_eq!(moves.push_cnt(), 2);
        // the root estimate is 3 and the bound stops at the optimum
        let rounds = result.stats.rounds();
        assert!(rounds >= 2 && rounds <= 4, "{}", rounds);
    }

    #[test]
    fn stops_when_out_of_time() {
        let level: Level = r"
###########
#@        #
# $$$$$$$ #
#         #
# ....... #
###########
"
        .parse()
        .unwrap();
        let config = Configuration::new(SolverKind::IdaStar, HeuristicKind::Simple)
            .with_time_limit(Duration::from_millis(50));
        let result = level.solve(&config);
        assert!(!result.success());
        assert_eq!(result.failure, Some(Failure::BudgetExceeded));
        assert!(result.explored > 0);
        assert!(result.elapsed >= Duration::from_millis(50));
    }
}
