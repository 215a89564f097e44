//! Game result derivation
//!
//! The result is a pure function of the position and the side on move:
//!
//! - both sides at zero pieces is a draw
//! - a side at zero pieces loses
//! - otherwise, if the side on move has no legal move, it loses
//! - otherwise the game is still running

use crate::board::BoardState;
use crate::move_gen::legal_moves;
use crate::turn::TurnState;
use crate::types::{Color, Outcome};

/// Current result, or `None` while the game is in progress.
pub fn outcome(board: &BoardState, turn: &TurnState) -> Option<Outcome> {
    let white = board.count(Color::White);
    let black = board.count(Color::Black);
    match (white, black) {
        (0, 0) => return Some(Outcome::Draw),
        (0, _) => return Some(Outcome::Winner(Color::Black)),
        (_, 0) => return Some(Outcome::Winner(Color::White)),
        _ => {}
    }

    let mover = turn.current();
    if legal_moves(board, turn, mover).is_empty() {
        return Some(Outcome::Winner(mover.opponent()));
    }
    None
}
