//! Move submission and legal-move queries

use tracing::debug;

use super::Game;
use crate::error::{MoveError, MoveResult};
use crate::executor::{self, MoveReport};
use crate::move_gen::{self, Enforcement};
use crate::types::{Color, Move, Square};

impl Game {
    /// Submit a move for the side on move.
    ///
    /// The move is checked against the full rule set (ownership, destination,
    /// mandatory capture, chain continuation, piece shape) and applied only
    /// if every check passes.
    ///
    /// # Arguments
    ///
    /// * `from` - Square of the moving piece
    /// * `to` - Destination square
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] describing the first rule that rejects the move.
    /// A rejected move never changes the game.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let report = game.submit_move(Square::new(5, 2), Square::new(4, 3))?;
    /// assert_eq!(report.next_player, Color::Black);
    /// ```
    pub fn submit_move(&mut self, from: Square, to: Square) -> MoveResult<MoveReport> {
        if self.winner().is_some() {
            return Err(MoveError::GameOver);
        }

        let validated = move_gen::validate(&self.board, &self.turn, from, to, Enforcement::Global)
            .inspect_err(|err| debug!(%from, %to, code = err.code(), "move rejected"))?;

        let report = executor::execute(&mut self.board, &mut self.turn, validated);
        debug!(mv = %report.mv, next = %report.next_player, "move applied");
        Ok(report)
    }

    /// Whether [`submit_move`](Self::submit_move) would accept `from -> to`.
    pub fn is_legal_move(&self, from: Square, to: Square) -> bool {
        self.winner().is_none()
            && move_gen::validate(&self.board, &self.turn, from, to, Enforcement::Global).is_ok()
    }

    /// Every legal move for `color` under mandatory capture.
    ///
    /// Only captures are returned if any exist; if a chain is active for
    /// `color`, only captures by the chain piece.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        move_gen::legal_moves(&self.board, &self.turn, color)
    }

    /// Every capture available to `color`, ignoring any active chain.
    pub fn all_captures(&self, color: Color) -> Vec<Move> {
        move_gen::all_captures(&self.board, color)
    }
}
