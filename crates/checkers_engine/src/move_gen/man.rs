//! Man move generation
//!
//! - **Step**: one diagonal square forward (White towards row 0, Black towards row 7)
//!   onto an empty square.
//! - **Capture**: over an adjacent opponent piece onto the empty square directly
//!   behind it, in any of the four diagonal directions.

use crate::board::BoardState;
use crate::constants::{DIAGONALS, MAN_JUMP_DISTANCE, MAN_STEP_COLS};
use crate::types::{Color, Move, Piece, Square};

use super::is_capture;

/// Landing squares two steps away along each diagonal.
fn jump_targets(from: Square) -> impl Iterator<Item = Square> {
    let distance = MAN_JUMP_DISTANCE as i8;
    DIAGONALS
        .into_iter()
        .filter_map(move |(dr, dc)| from.offset(dr * distance, dc * distance))
}

pub(super) fn push_captures(board: &BoardState, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    for to in jump_targets(from) {
        if is_capture(board, piece, from, to) {
            moves.push(Move::jump(from, to));
        }
    }
}

pub(super) fn has_capture(board: &BoardState, from: Square, piece: Piece) -> bool {
    jump_targets(from).any(|to| is_capture(board, piece, from, to))
}

pub(super) fn push_steps(board: &BoardState, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let forward = piece.color.forward();
    for dc in MAN_STEP_COLS {
        if let Some(to) = from.offset(forward, dc) {
            if board.is_empty(to) {
                moves.push(Move::step(from, to));
            }
        }
    }
}

/// Exact one-square forward diagonal step.
pub(super) fn is_step(from: Square, to: Square, color: Color) -> bool {
    MAN_STEP_COLS
        .into_iter()
        .any(|dc| from.offset(color.forward(), dc) == Some(to))
}
