use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{MapCell, Pos, MAX_BOXES, MAX_SIZE};
use crate::level::Level;
use crate::map::Map;
use crate::state::State;
use crate::vec2d::Vec2d;

/// Levels the solver refuses to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErr {
    Pos(usize, usize),
    TooLarge,
    MultiplePlayers,
    NoPlayer,
    IncompleteBorder,
    UnreachableBoxes,
    UnreachableTargets,
    BoxesTargets,
    TooManyBoxes,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than {} rows/columns", MAX_SIZE),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::NoPlayer => write!(f, "No player"),
            ParserErr::IncompleteBorder => {
                write!(f, "Incomplete border - the player can leave the map")
            }
            ParserErr::UnreachableBoxes => write!(
                f,
                "Unreachable boxes - some boxes are not on a target but can't be reached"
            ),
            ParserErr::UnreachableTargets => write!(
                f,
                "Unreachable targets - some targets don't have a box but can't be reached"
            ),
            ParserErr::BoxesTargets => write!(f, "Different number of boxes and targets"),
            ParserErr::TooManyBoxes => write!(f, "More than {} boxes", MAX_BOXES),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format)
pub(crate) fn parse(level: &str) -> Result<Level, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let level = level.trim_matches('\n').trim_end();

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut boxes = Vec::new();
    let mut player_pos = None;

    for (r, line) in level.lines().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        // row 0 and column 0 of the grid are the wall ring
        let mut row = vec![MapCell::Wall];
        for (c, cur_char) in line.chars().enumerate() {
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as u8 + 1, c as u8 + 1);

            let cell = match cur_char {
                '#' => MapCell::Wall,
                'p' | '@' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    MapCell::Empty
                }
                'P' | '+' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    targets.push(pos);
                    MapCell::Target
                }
                'b' | '$' => {
                    boxes.push(pos);
                    MapCell::Empty
                }
                'B' | '*' => {
                    boxes.push(pos);
                    targets.push(pos);
                    MapCell::Target
                }
                '.' => {
                    targets.push(pos);
                    MapCell::Target
                }
                ' ' | '-' | '_' => MapCell::Empty,
                _ => return Err(ParserErr::Pos(r, c)),
            };
            row.push(cell);
        }
        rows.push(row);
    }
    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;

    let cols = rows.iter().map(|row| row.len()).max().unwrap_or(0) + 1;
    let mut padded = Vec::with_capacity(rows.len() + 2);
    padded.push(vec![MapCell::Wall; cols]);
    for mut row in rows {
        // short rows are padded with empty cells, only the ring itself is wall
        row.resize(cols - 1, MapCell::Empty);
        row.push(MapCell::Wall);
        padded.push(row);
    }
    padded.push(vec![MapCell::Wall; cols]);
    let grid = Vec2d::new(&padded);

    let reachable = player_reachable(&grid, player_pos)?;
    for &pos in &boxes {
        if !reachable[pos] && grid[pos] != MapCell::Target {
            return Err(ParserErr::UnreachableBoxes);
        }
    }
    for &pos in &targets {
        if !reachable[pos] && !boxes.contains(&pos) {
            return Err(ParserErr::UnreachableTargets);
        }
    }

    if boxes.len() != targets.len() {
        return Err(ParserErr::BoxesTargets);
    }
    if boxes.len() > MAX_BOXES {
        return Err(ParserErr::TooManyBoxes);
    }

    Ok(Level::new(
        Map::new(grid, targets),
        State::new(player_pos, boxes),
    ))
}

/// Cells the player can walk to if there were no boxes.
///
/// Fails if the player can step onto the wall ring, that means the level as written isn't closed.
fn player_reachable(grid: &Vec2d<MapCell>, player_pos: Pos) -> Result<Vec2d<bool>, ParserErr> {
    let last_r = grid.rows() - 1;
    let last_c = grid.cols() - 1;

    let mut visited = grid.scratchpad();
    visited[player_pos] = true;
    let mut to_visit = vec![player_pos];
    while let Some(cur) = to_visit.pop() {
        for &next in &cur.neighbors() {
            if next.r == 0 || next.c == 0 || next.r == last_r || next.c == last_c {
                // we got out without hitting a wall
                return Err(ParserErr::IncompleteBorder);
            }
            if !visited[next] && grid[next] != MapCell::Wall {
                visited[next] = true;
                to_visit.push(next);
            }
        }
    }
    Ok(visited)
}
