use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::{MapCell, Pos};

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: u8,
    cols: u8,
}

impl<T> Vec2d<T> {
    pub(crate) fn rows(&self) -> u8 {
        self.rows
    }

    pub(crate) fn cols(&self) -> u8 {
        self.cols
    }

    pub(crate) fn scratchpad<U: Default + Clone>(&self) -> Vec2d<U> {
        self.scratchpad_with_default(U::default())
    }

    pub(crate) fn scratchpad_with_default<U: Clone>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = Pos> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Pos::new(r, c)))
    }
}

impl<T: Clone + Default> Vec2d<T> {
    /// Pads all rows to the same length
    pub(crate) fn new(grid: &[Vec<T>]) -> Self {
        assert!(!grid.is_empty() && grid.len() <= 255);

        let max_cols = grid.iter().map(|row| row.len()).max().unwrap_or(0);
        assert!(max_cols > 0 && max_cols <= 255);

        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(T::default());
            }
        }
        Vec2d {
            data,
            rows: grid.len() as u8,
            cols: max_cols as u8,
        }
    }
}

impl Display for Vec2d<MapCell> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols.into()) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for Vec2d<bool> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols.into()) {
            for &cell in row {
                write!(f, "{}", if cell { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T> Debug for Vec2d<T>
where
    Vec2d<T>: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        let index = usize::from(index.r) * usize::from(self.cols) + usize::from(index.c);
        // unchecked indexing is only marginally faster (if at all) to justify unsafe
        &self.data[index]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        let index = usize::from(index.r) * usize::from(self.cols) + usize::from(index.c);
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_and_positions() {
        let grid = vec![
            vec![MapCell::Wall, MapCell::Wall, MapCell::Wall],
            vec![MapCell::Wall, MapCell::Target],
        ];
        let grid = Vec2d::new(&grid);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid[Pos::new(1, 1)], MapCell::Target);
        assert_eq!(grid[Pos::new(1, 2)], MapCell::Empty);
        assert_eq!(grid.to_string(), "###\n#. \n");
        assert_eq!(grid.positions().count(), 6);
        assert_eq!(grid.positions().last(), Some(Pos::new(1, 2)));

        let mut scratch: Vec2d<bool> = grid.scratchpad();
        scratch[Pos::new(0, 2)] = true;
        assert_eq!(scratch.to_string(), "001\n000\n");
    }
}
