use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Contents, MapCell, Pos};
use crate::map::Map;
use crate::state::State;

pub struct MapFormatter<'a> {
    map: &'a Map,
    state: Option<&'a State>,
}

impl<'a> MapFormatter<'a> {
    pub(crate) fn new(map: &'a Map, state: Option<&'a State>) -> Self {
        Self { map, state }
    }

    fn write_to_formatter(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let grid = self.map.grid();
        let mut state_grid = grid.scratchpad();
        if let Some(state) = self.state {
            for &b in &state.boxes {
                state_grid[b] = Contents::Box;
            }
            state_grid[state.player_pos] = Contents::Player;
        }

        // skip the wall ring added by the parser
        for r in 1..grid.rows() - 1 {
            // don't print trailing empty cells to match the input level strings
            let mut last_non_empty = 0;
            for c in 1..grid.cols() - 1 {
                let pos = Pos::new(r, c);
                if grid[pos] != MapCell::Empty || state_grid[pos] != Contents::Empty {
                    last_non_empty = c;
                }
            }

            for c in 1..=last_non_empty {
                let pos = Pos::new(r, c);
                Self::write_cell_xsb(grid[pos], state_grid[pos], f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_cell_xsb(cell: MapCell, contents: Contents, f: &mut Formatter<'_>) -> fmt::Result {
        match (cell, contents) {
            (MapCell::Empty, Contents::Empty) => write!(f, " "),
            (MapCell::Empty, Contents::Box) => write!(f, "$"),
            (MapCell::Empty, Contents::Player) => write!(f, "@"),
            (MapCell::Wall, Contents::Empty) => write!(f, "#"),
            (MapCell::Wall, _) => unreachable!("Wall with non-empty contents"),
            (MapCell::Target, Contents::Empty) => write!(f, "."),
            (MapCell::Target, Contents::Box) => write!(f, "*"),
            (MapCell::Target, Contents::Player) => write!(f, "+"),
        }
    }
}

impl<'a> Display for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_to_formatter(f)
    }
}

impl<'a> Debug for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
