//! Game state queries and surrender

use tracing::info;

use super::Game;
use crate::board::BoardState;
use crate::status;
use crate::types::{Color, Outcome, Piece, Square};

impl Game {
    #[inline]
    pub fn current_player(&self) -> Color {
        self.turn.current()
    }

    /// Result of the game, or `None` while it is still running.
    ///
    /// Derived from the position on every call. A surrender overrides the
    /// position.
    pub fn winner(&self) -> Option<Outcome> {
        if let Some(loser) = self.surrendered {
            return Some(Outcome::Winner(loser.opponent()));
        }
        status::outcome(&self.board, &self.turn)
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// The side on move gives up; the opponent wins.
    ///
    /// Has no effect once the game already has a result.
    pub fn surrender(&mut self) {
        if self.winner().is_some() {
            return;
        }
        let loser = self.turn.current();
        info!(%loser, "player surrendered");
        self.surrendered = Some(loser);
    }

    /// Color that surrendered, if the game ended that way.
    pub fn surrendered(&self) -> Option<Color> {
        self.surrendered
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Live `(white, black)` piece counts.
    pub fn piece_counts(&self) -> (u8, u8) {
        (self.board.count(Color::White), self.board.count(Color::Black))
    }

    /// Square of the piece that must keep capturing, if a chain is active.
    pub fn chain_square(&self) -> Option<Square> {
        self.turn.chain_square()
    }

    /// Force the side on move (server-originated synchronization).
    ///
    /// Changing the side abandons an in-progress capture chain. Returns
    /// whether the side changed.
    pub fn force_current_player(&mut self, color: Color) -> bool {
        self.turn.force_player(color)
    }

    /// Read-only view of the board.
    pub fn board(&self) -> &BoardState {
        &self.board
    }
}
