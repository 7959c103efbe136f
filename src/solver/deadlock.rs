use crate::data::{Dir, Pos};
use crate::map::Map;
use crate::solver::preprocessing::PushDists;
use crate::state::State;

/// Whether the state provably can't be solved.
///
/// Never reports a solvable state as deadlocked.
pub(crate) fn is_deadlocked(map: &Map, dists: &PushDists, state: &State) -> bool {
    // a box on a target is never on a dead cell
    if state.boxes.iter().any(|&b| dists.is_dead(b)) {
        return true;
    }

    let frozen = frozen_boxes(map, dists, state);
    let frozen_off_target = state
        .boxes
        .iter()
        .zip(&frozen)
        .any(|(&b, &f)| f && !map.is_target(b));
    if frozen_off_target {
        return true;
    }

    unreachable_targets(map, dists, state, &frozen)
}

/// Marks boxes which can never move again.
///
/// Starts by assuming all boxes are frozen and keeps unfreezing those
/// that have a free axis until nothing changes (greatest fixed point).
/// A box is blocked along an axis by a wall, by another frozen box,
/// or when both cells along the axis are dead.
pub(crate) fn frozen_boxes(map: &Map, dists: &PushDists, state: &State) -> Vec<bool> {
    let mut frozen = vec![true; state.boxes.len()];

    let blocked = |frozen: &[bool], pos: Pos, a: Dir, b: Dir| {
        let (pa, pb) = (pos + a, pos + b);
        let stuck = |p: Pos| map.is_wall(p) || state.box_at(p).map_or(false, |i| frozen[i]);
        stuck(pa) || stuck(pb) || (dists.is_dead(pa) && dists.is_dead(pb))
    };

    loop {
        let mut changed = false;
        for (i, &box_pos) in state.boxes.iter().enumerate() {
            if !frozen[i] {
                continue;
            }
            let vertical = blocked(&frozen, box_pos, Dir::Up, Dir::Down);
            let horizontal = blocked(&frozen, box_pos, Dir::Left, Dir::Right);
            if !vertical || !horizontal {
                frozen[i] = false;
                changed = true;
            }
        }
        if !changed {
            return frozen;
        }
    }
}

/// Fewer off-target boxes can reach a free target than there are off-target boxes.
///
/// Targets under frozen boxes are taken for good, everything else might still be freed.
fn unreachable_targets(map: &Map, dists: &PushDists, state: &State, frozen: &[bool]) -> bool {
    let free_targets: Vec<usize> = map
        .targets()
        .iter()
        .enumerate()
        .filter(|&(_, &t)| state.box_at(t).map_or(true, |i| !frozen[i]))
        .map(|(i, _)| i)
        .collect();

    let mut off_target = 0;
    let mut can_reach = 0;
    for &box_pos in &state.boxes {
        if map.is_target(box_pos) {
            continue;
        }
        off_target += 1;
        if free_targets
            .iter()
            .any(|&t| dists.dist(box_pos, t).is_some())
        {
            can_reach += 1;
        }
    }

    can_reach < off_target
}
