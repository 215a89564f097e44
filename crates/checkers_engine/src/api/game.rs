//! Game lifecycle management
//!
//! Creating, resetting and setting up games.

use std::collections::HashSet;

use tracing::debug;

use crate::board::BoardState;
use crate::error::PositionError;
use crate::turn::TurnState;
use crate::types::{Color, Piece, Square};

/// A single game of checkers.
///
/// All state is private; see the `moves` and `state` methods for the
/// operations it supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub(super) board: BoardState,
    pub(super) turn: TurnState,
    /// Color that surrendered, if any.
    pub(super) surrendered: Option<Color>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a new game with the standard starting position and White to move.
    pub fn new() -> Self {
        Self {
            board: BoardState::initial(),
            turn: TurnState::new(),
            surrendered: None,
        }
    }

    /// Reset to the starting position for a rematch.
    pub fn reset(&mut self) {
        self.board = BoardState::initial();
        self.turn.reset();
        self.surrendered = None;
        debug!("game reset");
    }

    /// Set up an arbitrary position with `to_move` on move and no active chain.
    ///
    /// # Arguments
    ///
    /// * `pieces` - Squares and the pieces standing on them
    /// * `to_move` - Side on move
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if a square is not playable or given twice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use checkers_engine::{Color, Game, Piece, Square};
    ///
    /// let game = Game::from_position(
    ///     [
    ///         (Square::new(3, 2), Piece::man(Color::White)),
    ///         (Square::new(4, 3), Piece::man(Color::Black)),
    ///     ],
    ///     Color::White,
    /// )
    /// .unwrap();
    /// assert_eq!(game.piece_counts(), (1, 1));
    /// ```
    pub fn from_position<I>(pieces: I, to_move: Color) -> Result<Self, PositionError>
    where
        I: IntoIterator<Item = (Square, Piece)>,
    {
        let mut board = BoardState::empty();
        let mut seen = HashSet::new();
        for (square, piece) in pieces {
            if !square.is_playable() {
                return Err(PositionError::UnplayableSquare { square });
            }
            if !seen.insert(square) {
                return Err(PositionError::DuplicateSquare { square });
            }
            board.place(square, piece);
        }
        Ok(Self {
            board,
            turn: TurnState::with_player(to_move),
            surrendered: None,
        })
    }
}
