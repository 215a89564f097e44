//! Move execution
//!
//! Applies a [`ValidatedMove`] to the board and advances the turn state.
//!
//! Order of effects:
//! 1. Relocate the moving piece.
//! 2. Remove the captured piece, if any, and decrement its color's counter.
//! 3. Promote a man that ended on its promotion row.
//! 4. If the move captured and the (possibly just crowned) piece can capture
//!    again from its new square, keep the turn with an active chain;
//!    otherwise pass the turn.
//!
//! Promotion happens before the continuation check, so a man crowned in the
//! middle of a chain continues capturing as a king.

use tracing::{debug, error};

use crate::board::BoardState;
use crate::move_gen::{can_capture_from, ValidatedMove};
use crate::turn::TurnState;
use crate::types::{Color, Move, Piece, Square};

/// What happened when a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// The move as applied.
    pub mv: Move,
    /// Square and identity of the removed opponent piece.
    pub captured: Option<(Square, Piece)>,
    /// Whether the moving piece was crowned by this move.
    pub promoted: bool,
    /// Whether the same player must keep capturing with the same piece.
    pub chain_continues: bool,
    /// Player on move after this move.
    pub next_player: Color,
}

impl MoveReport {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Apply a validated move. The move must have been validated against the
/// same `board` and `turn`.
pub fn execute(board: &mut BoardState, turn: &mut TurnState, mv: ValidatedMove) -> MoveReport {
    let ValidatedMove { from, to, captured } = mv;

    let moved = board.relocate(from, to);
    debug_assert!(moved.is_some(), "validated move from empty square {from}");

    let captured = captured.and_then(|square| match board.remove_captured(square) {
        Some(piece) => Some((square, piece)),
        None => {
            error!(%square, "validated capture found no piece to remove");
            None
        }
    });

    let mut promoted = false;
    if let Some(piece) = board.piece_mut(to) {
        if !piece.is_king() && to.row == piece.color.promotion_row() {
            piece.promote();
            promoted = true;
            debug!(%to, color = %piece.color, "piece promoted");
        }
    }

    let chain_continues = captured.is_some() && can_capture_from(board, to);
    if chain_continues {
        turn.continue_chain(to);
    } else {
        turn.pass_turn();
    }

    MoveReport {
        mv: if captured.is_some() {
            Move::jump(from, to)
        } else {
            Move::step(from, to)
        },
        captured,
        promoted,
        chain_continues,
        next_player: turn.current(),
    }
}
