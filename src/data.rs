use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};

/// Max rows/cols of a level as written, the grid adds a wall ring around it
pub(crate) const MAX_SIZE: usize = 253;

/// Most boxes the parser accepts
pub(crate) const MAX_BOXES: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapCell {
    Empty,
    Wall,
    Target,
}

impl Default for MapCell {
    fn default() -> Self {
        MapCell::Empty
    }
}

impl Display for MapCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            MapCell::Empty => write!(f, " "),
            MapCell::Wall => write!(f, "#"),
            MapCell::Target => write!(f, "."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contents {
    Empty,
    Box,
    Player,
}

impl Default for Contents {
    fn default() -> Self {
        Contents::Empty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: u8,
    pub c: u8,
}

impl Pos {
    pub(crate) fn new(r: u8, c: u8) -> Self {
        Pos { r, c }
    }

    pub(crate) fn dist(self, other: Pos) -> u16 {
        let dr = (i16::from(self.r) - i16::from(other.r)).abs();
        let dc = (i16::from(self.c) - i16::from(other.c)).abs();
        (dr + dc) as u16
    }

    pub(crate) fn neighbors(self) -> [Pos; 4] {
        [
            self + Dir::Up,
            self + Dir::Down,
            self + Dir::Left,
            self + Dir::Right,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// Order in which successors are generated
pub(crate) const DIRECTIONS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

impl Dir {
    pub(crate) fn inverse(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Dir::Up => write!(f, "u"),
            Dir::Down => write!(f, "d"),
            Dir::Left => write!(f, "l"),
            Dir::Right => write!(f, "r"),
        }
    }
}

// Wrapping is fine: every non-wall cell has a wall ring around it
// so we never go out of bounds from a cell we could stand on.
impl Add<Dir> for Pos {
    type Output = Pos;

    fn add(self, dir: Dir) -> Pos {
        match dir {
            Dir::Up => Pos::new(self.r.wrapping_sub(1), self.c),
            Dir::Down => Pos::new(self.r.wrapping_add(1), self.c),
            Dir::Left => Pos::new(self.r, self.c.wrapping_sub(1)),
            Dir::Right => Pos::new(self.r, self.c.wrapping_add(1)),
        }
    }
}

impl Sub<Dir> for Pos {
    type Output = Pos;

    fn sub(self, dir: Dir) -> Pos {
        self + dir.inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_around() {
        let pos = Pos::new(3, 5);
        assert_eq!(pos + Dir::Up, Pos::new(2, 5));
        assert_eq!(pos + Dir::Down, Pos::new(4, 5));
        assert_eq!(pos + Dir::Left, Pos::new(3, 4));
        assert_eq!(pos + Dir::Right, Pos::new(3, 6));
        assert_eq!(pos - Dir::Right, Pos::new(3, 4));
        for &dir in &DIRECTIONS {
            assert_eq!(pos + dir - dir, pos);
            assert_eq!(pos - dir + dir, pos);
        }
    }

    #[test]
    fn manhattan() {
        assert_eq!(Pos::new(1, 1).dist(Pos::new(4, 3)), 5);
        assert_eq!(Pos::new(4, 3).dist(Pos::new(1, 1)), 5);
        assert_eq!(Pos::new(2, 2).dist(Pos::new(2, 2)), 0);
    }
}
