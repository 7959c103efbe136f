use std::collections::VecDeque;

use crate::data::{Dir, Pos, DIRECTIONS};
use crate::map::Map;
use crate::solver::Deadline;
use crate::vec2d::Vec2d;

/// Per-map data about where a single box can be pushed, computed once per solve.
///
/// Other boxes are ignored so everything here is optimistic:
/// a box that can't reach a target here can't reach it in any state.
#[derive(Clone)]
pub(crate) struct PushDists {
    /// Min number of pushes from a cell to each target (indexed like `Map::targets`)
    target_dists: Vec2d<Vec<Option<u16>>>,
    /// Cells from which a box can't reach any target, includes walls
    dead: Vec2d<bool>,
    /// Targets ordered from the one reachable from the fewest cells
    targets_by_difficulty: Vec<usize>,
}

impl PushDists {
    pub(crate) fn new(map: &Map) -> Self {
        match Self::with_deadline(map, &Deadline::new(None)) {
            Some(dists) => dists,
            None => unreachable!("no time limit"),
        }
    }

    /// One BFS per floor cell, None if the deadline passes before all of them are done.
    #[inline(never)] // this is called only once and this way it's easier to see in callgrind
    pub(crate) fn with_deadline(map: &Map, deadline: &Deadline) -> Option<Self> {
        let grid = map.grid();
        let push_dirs = push_dirs(map);

        let mut target_dists = grid.scratchpad_with_default(Vec::new());
        let mut dead = grid.scratchpad_with_default(true);
        let mut reachable_from = vec![0u32; map.targets().len()];

        for box_start_pos in grid.positions() {
            if map.is_wall(box_start_pos) {
                continue;
            }
            if deadline.expired() {
                debug!("Out of time while computing push dists");
                return None;
            }

            let dists = box_dists(map, &push_dirs, box_start_pos);
            let to_targets: Vec<_> = map.targets().iter().map(|&t| dists[t]).collect();
            for (i, dist) in to_targets.iter().enumerate() {
                if dist.is_some() {
                    reachable_from[i] += 1;
                }
            }
            dead[box_start_pos] = to_targets.iter().all(Option::is_none);
            target_dists[box_start_pos] = to_targets;
        }

        let mut targets_by_difficulty: Vec<usize> = (0..map.targets().len()).collect();
        targets_by_difficulty.sort_by_key(|&i| (reachable_from[i], i));

        debug!(
            "Push dists done, {} dead cells",
            grid.positions()
                .filter(|&pos| dead[pos] && !map.is_wall(pos))
                .count()
        );

        Some(PushDists {
            target_dists,
            dead,
            targets_by_difficulty,
        })
    }

    pub(crate) fn dist(&self, box_pos: Pos, target_index: usize) -> Option<u16> {
        self.target_dists[box_pos][target_index]
    }

    pub(crate) fn closest(&self, box_pos: Pos) -> Option<u16> {
        self.target_dists[box_pos].iter().filter_map(|&d| d).min()
    }

    pub(crate) fn is_dead(&self, pos: Pos) -> bool {
        self.dead[pos]
    }

    pub(crate) fn targets_by_difficulty(&self) -> &[usize] {
        &self.targets_by_difficulty
    }
}

/// For each cell and each side the player stands on (indexed by the direction from player to box),
/// the directions in which a lone box on that cell can be pushed.
fn push_dirs(map: &Map) -> Vec2d<[[bool; 4]; 4]> {
    let mut push_dirs = map.grid().scratchpad_with_default([[false; 4]; 4]);

    for box_pos in map.grid().positions() {
        if map.is_wall(box_pos) {
            continue;
        }

        for &player_to_box in &DIRECTIONS {
            let player_pos = box_pos - player_to_box;
            if map.is_wall(player_pos) {
                continue;
            }

            push_dirs[box_pos][player_to_box as usize] = one_box_push_dirs(map, box_pos, player_pos);
        }
    }

    push_dirs
}

/// Finds in which directions the box is pushable
fn one_box_push_dirs(map: &Map, box_pos: Pos, player_start_pos: Pos) -> [bool; 4] {
    let mut ret = [false; 4];

    let mut touched = map.grid().scratchpad();
    touched[player_start_pos] = true;

    // BFS turns out to be faster than DFS here on the levels i benched
    let mut to_visit = VecDeque::new();
    to_visit.push_back(player_start_pos);

    while let Some(cur_pos) = to_visit.pop_front() {
        for &dir in &DIRECTIONS {
            let next_pos = cur_pos + dir;
            if next_pos == box_pos {
                // can't step on this pos (so `else if` is not taken) but can we actually push?
                if !map.is_wall(next_pos + dir) {
                    // box pos can be touched multiple times - that's the whole point
                    ret[dir as usize] = true;
                }
            } else if !map.is_wall(next_pos) && !touched[next_pos] {
                touched[next_pos] = true;
                to_visit.push_back(next_pos);
            }
        }
    }

    ret
}

/// BFS of pushes fanning out from the box position, starting from every side at once.
fn box_dists(map: &Map, push_dirs: &Vec2d<[[bool; 4]; 4]>, box_start_pos: Pos) -> Vec2d<Option<u16>> {
    let mut dists = map.grid().scratchpad();

    // `visited` must be per direction because going back to the same cell from a different direction
    // means different areas are accessible.
    let mut visited = map.grid().scratchpad_with_default([false; 4]);
    let mut to_visit = VecDeque::new();
    for &player_to_box in &DIRECTIONS {
        if !map.is_wall(box_start_pos - player_to_box) {
            to_visit.push_back((box_start_pos, player_to_box, 0));
        }
    }

    while let Some((cur_box_pos, player_to_box, cur_dist)) = to_visit.pop_front() {
        let side: Dir = player_to_box;
        if visited[cur_box_pos][side as usize] {
            continue;
        }
        visited[cur_box_pos][side as usize] = true;

        let old_dist: &mut Option<u16> = &mut dists[cur_box_pos];
        if old_dist.is_none() {
            // given this is BFS, the old value, if there is any, is always better
            *old_dist = Some(cur_dist);
        }

        for &push_dir in &DIRECTIONS {
            if push_dirs[cur_box_pos][side as usize][push_dir as usize] {
                // after the push the player stands where the box was
                to_visit.push_back((cur_box_pos + push_dir, push_dir, cur_dist + 1));
            }
        }
    }

    dists
}
