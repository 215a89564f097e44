//! Error types for the checkers engine
//!
//! [`MoveError`] is the typed rejection reason returned by
//! [`Game::submit_move`](crate::Game::submit_move). Every variant carries a
//! stable machine-readable [`code`](MoveError::code) so callers (the server in
//! particular) can branch on it or put it on the wire without parsing the
//! human-readable message.

use thiserror::Error;

use crate::types::{Color, Square};

/// Reasons a submitted move is rejected. A rejected move never mutates the game.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The game already has a result
    #[error("The game is already over")]
    GameOver,

    /// Source or destination lies outside the 8×8 board
    #[error("Square {square} is outside the board")]
    OutOfBounds { square: Square },

    /// No piece at the source square
    #[error("No piece at square {square}")]
    NoPiece { square: Square },

    /// The piece belongs to the side not on move
    #[error("Piece at {square} does not belong to {mover}")]
    NotYourPiece { square: Square, mover: Color },

    /// Destination is not empty
    #[error("Destination {square} is occupied")]
    DestinationOccupied { square: Square },

    /// A capture exists somewhere on the board, so a plain move is not allowed
    #[error("A capture is available and must be taken")]
    CaptureRequired,

    /// A capture chain is in progress with another piece
    #[error("The capture must continue with the piece on {square}")]
    MustContinueWithPiece { square: Square },

    /// A capture chain is in progress and the submitted move is not a capture
    #[error("The next move in a capture chain must be a capture")]
    ContinuationMustCapture,

    /// The move captures, but is not one of the captures currently available
    #[error("This capture is not one of the available captures")]
    CaptureNotAvailable,

    /// The move does not match how the piece moves
    #[error("Illegal move from {from} to {to}")]
    IllegalShape { from: Square, to: Square },
}

impl MoveError {
    /// Stable reason code, used in `ERROR:<code>` responses.
    pub const fn code(&self) -> &'static str {
        match self {
            MoveError::GameOver => "GAME_OVER",
            MoveError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            MoveError::NoPiece { .. } => "NO_PIECE",
            MoveError::NotYourPiece { .. } => "NOT_YOUR_PIECE",
            MoveError::DestinationOccupied { .. } => "DESTINATION_OCCUPIED",
            MoveError::CaptureRequired => "CAPTURE_REQUIRED",
            MoveError::MustContinueWithPiece { .. } => "MUST_CONTINUE_WITH_PIECE",
            MoveError::ContinuationMustCapture => "CONTINUATION_MUST_CAPTURE",
            MoveError::CaptureNotAvailable => "CAPTURE_NOT_AVAILABLE",
            MoveError::IllegalShape { .. } => "ILLEGAL_SHAPE",
        }
    }
}

/// Errors raised while setting up a custom position.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    /// Pieces may only stand on dark squares
    #[error("Square {square} is not a playable square")]
    UnplayableSquare { square: Square },

    /// Two pieces were given for the same square
    #[error("Square {square} was given twice")]
    DuplicateSquare { square: Square },
}

/// Result type alias for move submission
pub type MoveResult<T> = Result<T, MoveError>;
