use crate::data::{MapCell, Pos};
use crate::map::Map;

/// Player position and box positions.
///
/// Boxes are kept sorted so equal configurations compare and hash equal
/// no matter in which order the boxes were moved.
#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct State {
    pub(crate) player_pos: Pos,
    pub(crate) boxes: Vec<Pos>,
}

impl State {
    pub(crate) fn new(player_pos: Pos, mut boxes: Vec<Pos>) -> State {
        boxes.sort();
        State { player_pos, boxes }
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }

    pub(crate) fn box_at(&self, pos: Pos) -> Option<usize> {
        self.boxes.binary_search(&pos).ok()
    }

    pub(crate) fn has_box(&self, pos: Pos) -> bool {
        self.box_at(pos).is_some()
    }

    /// Boxes == targets in count so every box on a target means every target has a box
    pub fn is_solved(&self, map: &Map) -> bool {
        self.boxes.iter().all(|&b| map.is_target(b))
    }

    /// Player and boxes are inside the map, not on walls and don't overlap.
    pub(crate) fn is_valid(&self, map: &Map) -> bool {
        let rows = map.grid().rows();
        let cols = map.grid().cols();
        let inside = |pos: Pos| pos.r < rows && pos.c < cols && map.grid()[pos] != MapCell::Wall;

        if self.boxes.len() != map.box_count() || !inside(self.player_pos) {
            return false;
        }
        if !self.boxes.iter().all(|&b| inside(b)) {
            return false;
        }
        // sorted so duplicates are adjacent
        if self.boxes.windows(2).any(|w| w[0] == w[1]) {
            return false;
        }
        !self.has_box(self.player_pos)
    }
}
