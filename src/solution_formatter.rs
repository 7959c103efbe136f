use std::fmt::{self, Debug, Display, Formatter};

use crate::map::Map;
use crate::moves::Moves;
use crate::solver::expand;
use crate::state::State;

/// Prints the initial state followed by the state after each push (or each move).
pub struct SolutionFormatter<'a> {
    map: &'a Map,
    initial_state: &'a State,
    moves: &'a Moves,
    include_steps: bool,
}

impl<'a> SolutionFormatter<'a> {
    pub(crate) fn new(
        map: &'a Map,
        initial_state: &'a State,
        moves: &'a Moves,
        include_steps: bool,
    ) -> Self {
        Self {
            map,
            initial_state,
            moves,
            include_steps,
        }
    }
}

impl Display for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.map.xsb_with_state(self.initial_state))?;
        let mut last_state = self.initial_state.clone();
        for mov in self.moves {
            // moves from a different level stop the output instead of printing garbage
            let new_state = match expand::apply(self.map, &last_state, mov.dir) {
                Some((_, new_state)) => new_state,
                None => return writeln!(f, "Illegal move: {}", mov),
            };
            if mov.is_push || self.include_steps {
                writeln!(f, "{}", self.map.xsb_with_state(&new_state))?;
            }
            last_state = new_state;
        }
        Ok(())
    }
}

impl Debug for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::level::Level;
    use crate::moves::Moves;

    #[test]
    fn printing_pushes() {
        let level: Level = r"
######
#@ $.#
######
"
        .parse()
        .unwrap();
        let moves: Moves = "rR".parse().unwrap();

        let expected = "\
######
#@ $.#
######

######
#  @*#
######

";
        assert_eq!(level.xsb_solution(&moves, false).to_string(), expected);

        let expected = "\
######
#@ $.#
######

######
# @$.#
######

######
#  @*#
######

";
        assert_eq!(level.xsb_solution(&moves, true).to_string(), expected);
    }
}
