use crate::data::{Dir, DIRECTIONS};
use crate::map::Map;
use crate::moves::Move;
use crate::state::State;

// Terminology:
// move = changing player position by one cell
// push = a move that changes a box position
// step = a move that doesn't change a box position

/// Moves the player one cell, pushing a box if there's one in the way.
///
/// Returns None if the player would walk into a wall
/// or push a box into a wall or another box.
pub(crate) fn apply(map: &Map, state: &State, dir: Dir) -> Option<(Move, State)> {
    let new_player_pos = state.player_pos + dir;
    if map.is_wall(new_player_pos) {
        return None;
    }

    match state.box_at(new_player_pos) {
        None => Some((
            Move::new(dir, false),
            State {
                player_pos: new_player_pos,
                boxes: state.boxes.clone(),
            },
        )),
        Some(box_index) => {
            let push_dest = new_player_pos + dir;
            if map.is_wall(push_dest) || state.has_box(push_dest) {
                return None;
            }
            let mut new_boxes = state.boxes.clone();
            new_boxes[box_index] = push_dest;
            Some((Move::new(dir, true), State::new(new_player_pos, new_boxes)))
        }
    }
}

/// All legal moves from the state, always in the order up, down, left, right.
pub(crate) fn successors(map: &Map, state: &State) -> Vec<(Move, State)> {
    DIRECTIONS
        .iter()
        .filter_map(|&dir| apply(map, state, dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::level::Level;

    fn expand(level: &str) -> Vec<(Move, State)> {
        let level: Level = level.parse().unwrap();
        successors(level.map(), level.initial_state())
    }

    #[test]
    fn steps_and_pushes() {
        let level = r"
 ####
# $  #
# @$*#
# $  #
# ...#
 ####
";
        let moves: Vec<_> = expand(level).into_iter().map(|(m, _)| m).collect();
        // up pushes into the wall, right pushes into the box on target
        assert_eq!(
            moves,
            vec![Move::new(Dir::Down, true), Move::new(Dir::Left, false)]
        );
    }

    #[test]
    fn steps_only() {
        let level = r"
 ####
#    #
# @ *#
# $  #
#   .#
 ####
";
        let successors = expand(level);
        assert_eq!(successors.len(), 4);
        assert!(successors.iter().filter(|(m, _)| m.is_push).count() == 1);
        for (_, state) in &successors {
            assert_eq!(state.boxes().len(), 2);
        }
    }

    #[test]
    fn push_moves_player_and_box() {
        let level: Level = r"
#####
#@$.#
#####
"
        .parse()
        .unwrap();
        let initial = level.initial_state();
        let (mov, state) = apply(level.map(), initial, Dir::Right).unwrap();
        assert_eq!(mov, Move::new(Dir::Right, true));
        assert_eq!(state.player_pos(), initial.boxes()[0]);
        assert!(state.is_solved(level.map()));
        assert!(apply(level.map(), &state, Dir::Right).is_none());
        assert!(apply(level.map(), initial, Dir::Up).is_none());
    }
}
