use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use crate::data::Dir;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub dir: Dir,
    pub is_push: bool,
}

impl Move {
    pub fn new(dir: Dir, is_push: bool) -> Self {
        Move { dir, is_push }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_push {
            write!(f, "{}", self.dir.to_string().to_uppercase())
        } else {
            write!(f, "{}", self.dir)
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A solution in LURD notation - lowercase letters are steps, uppercase are pushes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub fn new(moves: Vec<Move>) -> Self {
        Moves(moves)
    }

    pub fn move_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn push_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.is_push).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn add(&mut self, mov: Move) {
        self.0.push(mov);
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = ::std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = ::std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseMovesErr(pub char);

impl Display for ParseMovesErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid move: '{}'", self.0)
    }
}

impl Error for ParseMovesErr {}

impl FromStr for Moves {
    type Err = ParseMovesErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut moves = Moves::default();
        for ch in s.trim().chars() {
            let mov = match ch {
                'u' => Move::new(Dir::Up, false),
                'd' => Move::new(Dir::Down, false),
                'l' => Move::new(Dir::Left, false),
                'r' => Move::new(Dir::Right, false),
                'U' => Move::new(Dir::Up, true),
                'D' => Move::new(Dir::Down, true),
                'L' => Move::new(Dir::Left, true),
                'R' => Move::new(Dir::Right, true),
                _ => return Err(ParseMovesErr(ch)),
            };
            moves.add(mov);
        }
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_moves() {
        let moves = Moves::new(vec![
            Move::new(Dir::Up, false),
            Move::new(Dir::Right, false),
            Move::new(Dir::Down, false),
            Move::new(Dir::Left, false),
            Move::new(Dir::Up, true),
            Move::new(Dir::Right, true),
            Move::new(Dir::Down, true),
            Move::new(Dir::Left, true),
        ]);
        assert_eq!(moves.to_string(), "urdlURDL");
        assert_eq!(moves.move_cnt(), 8);
        assert_eq!(moves.push_cnt(), 4);
    }

    #[test]
    fn parsing_moves() {
        let moves: Moves = "rrURd".parse().unwrap();
        assert_eq!(moves.move_cnt(), 5);
        assert_eq!(moves.push_cnt(), 2);
        assert_eq!(moves.to_string(), "rrURd");
        assert_eq!(moves.iter().next(), Some(&Move::new(Dir::Right, false)));

        assert_eq!("rrx".parse::<Moves>(), Err(ParseMovesErr('x')));
        assert!("".parse::<Moves>().unwrap().is_empty());
    }
}
