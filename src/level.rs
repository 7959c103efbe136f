use std::fmt::{self, Debug, Display, Formatter};

use crate::map::Map;
use crate::map_formatter::MapFormatter;
use crate::moves::Moves;
use crate::solution_formatter::SolutionFormatter;
use crate::solver::expand;
use crate::solver::SolverErr;
use crate::state::State;

/// A parsed level - the map and the initial state.
#[derive(Clone)]
pub struct Level {
    map: Map,
    state: State,
}

impl Level {
    pub(crate) fn new(map: Map, state: State) -> Self {
        Level { map, state }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn initial_state(&self) -> &State {
        &self.state
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        MapFormatter::new(&self.map, Some(&self.state))
    }

    pub fn xsb_solution<'a>(&'a self, moves: &'a Moves, include_steps: bool) -> SolutionFormatter<'a> {
        SolutionFormatter::new(&self.map, &self.state, moves, include_steps)
    }

    /// Applies the moves to the initial state, checking each one is legal
    /// and marked as a push exactly when it moves a box.
    pub fn replay(&self, moves: &Moves) -> Result<State, SolverErr> {
        let mut state = self.state.clone();
        for (step, &mov) in moves.iter().enumerate() {
            match expand::apply(&self.map, &state, mov.dir) {
                Some((actual, new_state)) if actual == mov => state = new_state,
                _ => return Err(SolverErr::IllegalMove(step)),
            }
        }
        Ok(state)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.xsb())
    }
}
