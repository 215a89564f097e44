//! Move generation and validation
//!
//! Pure functions over a borrowed [`BoardState`] and [`TurnState`].
//!
//! ## Capture Geometry
//!
//! A capture from `from` to `to` is valid when both squares lie on one
//! diagonal at distance ≥ 2, the destination is empty, and the strictly
//! interior squares hold exactly one piece which belongs to the opponent.
//! A man additionally has to land immediately behind that piece (distance 2).
//! [`captured_square`] is the single source of truth for "is this a capture":
//! generation, validation and execution all go through it.
//!
//! ## Mandatory Capture
//!
//! - If any capture exists for the side to move, only captures are legal.
//! - If a capture chain is active, only captures by the chain piece are legal.
//! - Otherwise men step one square forward and kings slide along open diagonals.

mod king;
mod man;

use crate::board::BoardState;
use crate::error::MoveError;
use crate::turn::TurnState;
use crate::types::{Color, Move, Piece, Rank, Square};

/// How much of the rule set [`validate`] enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Mandatory-capture and chain-continuation constraints plus piece shape.
    Global,
    /// Piece shape only (ownership, destination and geometry).
    ShapeOnly,
}

/// A move that passed validation, together with its resolved capture.
///
/// Only this module can build one, so the executor never has to re-detect
/// whether a move is a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMove {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) captured: Option<Square>,
}

impl ValidatedMove {
    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    /// Square of the opponent piece this move removes, if it is a capture.
    pub fn captured(&self) -> Option<Square> {
        self.captured
    }
}

/// Square of the piece captured by moving `piece` from `from` to `to`, or
/// `None` when the move is not a valid capture.
pub fn captured_square(board: &BoardState, piece: Piece, from: Square, to: Square) -> Option<Square> {
    if !board.is_empty(to) {
        return None;
    }
    let (row_step, col_step, distance) = from.diagonal_to(to)?;
    if distance < 2 {
        return None;
    }

    let mut captured = None;
    let mut current = from;
    for _ in 1..distance {
        current = current.offset(row_step, col_step)?;
        match board.piece_at(current) {
            None => {}
            Some(other) if other.color != piece.color && captured.is_none() => {
                captured = Some(current);
            }
            // Own piece, or a second opponent piece on the path
            Some(_) => return None,
        }
    }

    match piece.rank {
        Rank::Man if distance != crate::constants::MAN_JUMP_DISTANCE => None,
        _ => captured,
    }
}

/// Whether moving `piece` from `from` to `to` would be a capture.
#[inline]
pub fn is_capture(board: &BoardState, piece: Piece, from: Square, to: Square) -> bool {
    captured_square(board, piece, from, to).is_some()
}

/// All captures available to the piece standing on `from`.
pub fn captures_from(board: &BoardState, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.piece_at(from) {
        push_captures(board, from, piece, &mut moves);
    }
    moves
}

/// Whether the piece on `from` has at least one capture.
pub fn can_capture_from(board: &BoardState, from: Square) -> bool {
    match board.piece_at(from) {
        Some(piece) => match piece.rank {
            Rank::Man => man::has_capture(board, from, piece),
            Rank::King => king::has_capture(board, from, piece),
        },
        None => false,
    }
}

/// Every capture available to `color`, ignoring any active chain.
pub fn all_captures(board: &BoardState, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces_of(color) {
        push_captures(board, from, piece, &mut moves);
    }
    moves
}

/// Every legal move for `color` under the mandatory-capture policy.
///
/// When captures exist only captures are returned; when additionally a chain
/// is active for `color`, only captures by the chain piece are returned.
pub fn legal_moves(board: &BoardState, turn: &TurnState, color: Color) -> Vec<Move> {
    let captures = all_captures(board, color);
    if !captures.is_empty() {
        return match turn.chain_square() {
            Some(chain) if turn.current() == color => {
                captures.into_iter().filter(|mv| mv.from == chain).collect()
            }
            _ => captures,
        };
    }

    let mut moves = Vec::new();
    for (from, piece) in board.pieces_of(color) {
        match piece.rank {
            Rank::Man => man::push_steps(board, from, piece, &mut moves),
            Rank::King => king::push_slides(board, from, &mut moves),
        }
    }
    moves
}

/// Validate moving the piece on `from` to `to` for the side on move.
///
/// With [`Enforcement::Global`] the mandatory-capture and chain-continuation
/// constraints are re-derived exactly as [`legal_moves`] applies them.
///
/// # Errors
///
/// Returns the first [`MoveError`] that applies; checks run in the order
/// bounds, ownership, destination, mandatory rules, shape.
pub fn validate(
    board: &BoardState,
    turn: &TurnState,
    from: Square,
    to: Square,
    enforcement: Enforcement,
) -> Result<ValidatedMove, MoveError> {
    for square in [from, to] {
        if !square.is_on_board() {
            return Err(MoveError::OutOfBounds { square });
        }
    }

    let piece = board
        .piece_at(from)
        .ok_or(MoveError::NoPiece { square: from })?;
    let mover = turn.current();
    if piece.color != mover {
        return Err(MoveError::NotYourPiece {
            square: from,
            mover,
        });
    }
    if !board.is_empty(to) {
        return Err(MoveError::DestinationOccupied { square: to });
    }

    let captured = captured_square(board, piece, from, to);

    if enforcement == Enforcement::Global {
        if let Some(chain) = turn.chain_square() {
            if from != chain {
                return Err(MoveError::MustContinueWithPiece { square: chain });
            }
            if captured.is_none() {
                return Err(MoveError::ContinuationMustCapture);
            }
        } else {
            let captures = all_captures(board, mover);
            if !captures.is_empty() {
                if captured.is_none() {
                    return Err(MoveError::CaptureRequired);
                }
                if !captures.iter().any(|mv| mv.from == from && mv.to == to) {
                    return Err(MoveError::CaptureNotAvailable);
                }
            }
        }
    }

    let shape_ok = match (piece.rank, captured) {
        // Geometry already checked by `captured_square`
        (_, Some(_)) => true,
        (Rank::Man, None) => man::is_step(from, to, piece.color),
        (Rank::King, None) => king::is_slide(board, from, to),
    };
    if !shape_ok {
        return Err(MoveError::IllegalShape { from, to });
    }

    Ok(ValidatedMove { from, to, captured })
}

fn push_captures(board: &BoardState, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.rank {
        Rank::Man => man::push_captures(board, from, piece, moves),
        Rank::King => king::push_captures(board, from, piece, moves),
    }
}
