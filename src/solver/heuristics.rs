use crate::config::HeuristicKind;
use crate::data::{Dir, Pos};
use crate::map::Map;
use crate::solver::assignment::min_cost_assignment;
use crate::solver::preprocessing::PushDists;
use crate::state::State;

/// Cost of a box-target pair that can't be matched.
/// Larger than any sum of real push distances so the assignment avoids it whenever possible.
const UNREACHABLE: u32 = 100_000_000;

const UNMATCHED_TARGET: u32 = 1000;
const TUNNEL_PENALTY: u32 = 80;
const ADJACENT_BOX_PENALTY: u32 = 150;

/// Estimates the number of moves left.
///
/// Returns None when the state can't be solved (some box can't reach any target
/// or there's no way to give every box its own target).
/// Returns 0 exactly for solved states.
pub(crate) fn evaluate(kind: HeuristicKind, map: &Map, dists: &PushDists, state: &State) -> Option<u32> {
    match kind {
        HeuristicKind::Simple => simple(dists, state),
        HeuristicKind::Matching => matching(map, dists, state),
        HeuristicKind::TargetMatching => Some(target_matching(map, dists, state)),
        HeuristicKind::IdaStar => ida_star(map, dists, state),
    }
}

/// Sum of push distances to the closest target, targets can be shared.
fn simple(dists: &PushDists, state: &State) -> Option<u32> {
    let mut sum = 0;
    for &box_pos in &state.boxes {
        sum += u32::from(dists.closest(box_pos)?);
    }
    Some(sum)
}

/// Min cost assignment of boxes to targets using push distances.
fn matching(map: &Map, dists: &PushDists, state: &State) -> Option<u32> {
    let costs: Vec<Vec<u32>> = state
        .boxes
        .iter()
        .map(|&box_pos| {
            (0..map.targets().len())
                .map(|t| dists.dist(box_pos, t).map_or(UNREACHABLE, u32::from))
                .collect()
        })
        .collect();

    let (total, assignment) = min_cost_assignment(&costs);
    let impossible = assignment
        .iter()
        .enumerate()
        .any(|(b, &t)| costs[b][t] == UNREACHABLE);
    if impossible {
        None
    } else {
        Some(total as u32)
    }
}

/// Matching plus the steps the player needs before the first push.
fn ida_star(map: &Map, dists: &PushDists, state: &State) -> Option<u32> {
    let pushes = matching(map, dists, state)?;
    if pushes == 0 {
        return Some(0);
    }
    // any box can be pushed first, even one already on a target
    let steps = state
        .boxes
        .iter()
        .map(|&b| u32::from(state.player_pos.dist(b)) - 1)
        .min()
        .unwrap_or(0);
    Some(pushes + steps)
}

/// Fills the hardest targets first, each with the closest free box,
/// then adds penalties for boxes in awkward spots. Overestimates on purpose.
fn target_matching(map: &Map, dists: &PushDists, state: &State) -> u32 {
    let mut used = vec![false; state.boxes.len()];
    let mut cost = 0;

    for &t in dists.targets_by_difficulty() {
        let closest = state
            .boxes
            .iter()
            .enumerate()
            .filter(|&(b, _)| !used[b])
            .filter_map(|(b, &box_pos)| dists.dist(box_pos, t).map(|d| (d, b)))
            .min();
        match closest {
            Some((dist, b)) => {
                used[b] = true;
                cost += u32::from(dist) * 5 / 2;
            }
            None => cost += UNMATCHED_TARGET,
        }
    }

    let off_target: Vec<Pos> = state
        .boxes
        .iter()
        .cloned()
        .filter(|&b| !map.is_target(b))
        .collect();
    for &box_pos in &off_target {
        if is_tunnel(map, box_pos) {
            cost += TUNNEL_PENALTY;
        }
        if box_pos.neighbors().iter().any(|&n| state.has_box(n)) {
            cost += ADJACENT_BOX_PENALTY;
        }
    }
    if let Some(player_dist) = off_target.iter().map(|&b| state.player_pos.dist(b)).min() {
        cost += u32::from(player_dist);
    }

    cost
}

/// Walls on both sides along either axis.
fn is_tunnel(map: &Map, pos: Pos) -> bool {
    (map.is_wall(pos + Dir::Up) && map.is_wall(pos + Dir::Down))
        || (map.is_wall(pos + Dir::Left) && map.is_wall(pos + Dir::Right))
}
