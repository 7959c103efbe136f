//! Brute force helpers to check the solvers against on tiny levels.

use std::collections::VecDeque;

use fnv::FnvHashSet;

use crate::level::Level;
use crate::map::Map;
use crate::solver::expand;
use crate::state::State;

/// Levels every configuration solves quickly.
pub(crate) const SMALL_LEVELS: &[&str] = &[
    r"
#####
#@$.#
#####
",
    r"
#############
#@$        .#
#############
",
    r"
#######
#  @  #
# $ $ #
# . . #
#     #
#######
",
];

/// Levels only small enough for brute force, searching them can take a while.
pub(crate) const BRUTE_FORCE_LEVELS: &[&str] = &[
    r"
####
# .#
#  ###
#*@  #
#  $ #
#  ###
####
",
    r"
#######
#.    #
####  #
#  $  #
# @   #
#######
",
];

pub(crate) fn all_levels() -> impl Iterator<Item = &'static str> {
    SMALL_LEVELS.iter().chain(BRUTE_FORCE_LEVELS).cloned()
}

/// States reachable from the initial state in BFS order.
pub(crate) fn reachable_states(level: &Level, limit: usize) -> Vec<State> {
    let mut seen = FnvHashSet::default();
    let mut ret = Vec::new();
    let mut to_visit = VecDeque::new();
    seen.insert(level.initial_state().clone());
    to_visit.push_back(level.initial_state().clone());

    while let Some(state) = to_visit.pop_front() {
        if ret.len() >= limit {
            break;
        }
        for (_, succ) in expand::successors(level.map(), &state) {
            if seen.insert(succ.clone()) {
                to_visit.push_back(succ);
            }
        }
        ret.push(state);
    }
    ret
}

/// Length of the shortest solution in moves, None if there is none.
///
/// Panics if the state space is bigger than `limit`.
pub(crate) fn optimal_len(map: &Map, state: &State, limit: usize) -> Option<usize> {
    let mut seen = FnvHashSet::default();
    let mut to_visit = VecDeque::new();
    seen.insert(state.clone());
    to_visit.push_back((state.clone(), 0));

    while let Some((cur, len)) = to_visit.pop_front() {
        if cur.is_solved(map) {
            return Some(len);
        }
        for (_, succ) in expand::successors(map, &cur) {
            if seen.insert(succ.clone()) {
                to_visit.push_back((succ, len + 1));
            }
        }
        assert!(seen.len() <= limit, "state space too big for brute force");
    }
    None
}

#[test]
fn small_levels_are_solvable() {
    for level in all_levels() {
        let level: Level = level.parse().unwrap();
        assert!(optimal_len(level.map(), level.initial_state(), 200_000).is_some());
    }
}
