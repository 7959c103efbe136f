use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{MapCell, Pos};
use crate::map_formatter::MapFormatter;
use crate::state::State;
use crate::vec2d::Vec2d;

/// The static part of a level - walls and targets.
///
/// The grid is surrounded by a ring of walls which isn't part of the level as written,
/// so every neighbor of a non-wall cell is a valid position.
#[derive(Clone)]
pub struct Map {
    grid: Vec2d<MapCell>,
    targets: Vec<Pos>,
}

impl Map {
    pub(crate) fn new(grid: Vec2d<MapCell>, mut targets: Vec<Pos>) -> Self {
        targets.sort();
        Map { grid, targets }
    }

    pub(crate) fn grid(&self) -> &Vec2d<MapCell> {
        &self.grid
    }

    /// Rows of the level as written
    pub fn rows(&self) -> usize {
        usize::from(self.grid.rows()) - 2
    }

    /// Columns of the level as written
    pub fn cols(&self) -> usize {
        usize::from(self.grid.cols()) - 2
    }

    pub fn targets(&self) -> &[Pos] {
        &self.targets
    }

    pub fn box_count(&self) -> usize {
        self.targets.len()
    }

    pub(crate) fn is_wall(&self, pos: Pos) -> bool {
        self.grid[pos] == MapCell::Wall
    }

    pub(crate) fn is_target(&self, pos: Pos) -> bool {
        self.grid[pos] == MapCell::Target
    }

    pub fn xsb_with_state<'a>(&'a self, state: &'a State) -> MapFormatter<'a> {
        MapFormatter::new(self, Some(state))
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        MapFormatter::new(self, None)
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::level::Level;

    #[test]
    fn formatting_map() {
        let xsb_level = r"
*###*
#@$.#
*###*#
"
        .trim_start_matches('\n');
        let xsb_map = "
.###.
#  .#
.###.#
"
        .trim_start_matches('\n');

        let level: Level = xsb_level.parse().unwrap();
        assert_eq!(format!("{}", level.map()), xsb_map);
        assert_eq!(format!("{:?}", level.map()), xsb_map);
        assert_eq!(level.map().rows(), 3);
        assert_eq!(level.map().cols(), 6);
        assert_eq!(level.map().box_count(), 5);
    }
}
