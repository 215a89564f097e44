//! Turn state machine
//!
//! States are `(player, chain)` where `chain` is either none or the square of
//! the piece that must keep capturing. Initial state is `(White, none)`.
//!
//! | Event                                   | Next state                  |
//! |-----------------------------------------|-----------------------------|
//! | non-capture, or capture that cannot go on | `(opponent, none)`        |
//! | capture that can go on from `to`        | `(same player, active(to))` |
//! | forced player change                    | `(forced, none)`            |
//!
//! The chain square, when set, always holds a piece of the current player.

use tracing::{debug, info};

use crate::types::{Color, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    current: Color,
    chain: Option<Square>,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    pub const fn new() -> Self {
        Self {
            current: Color::White,
            chain: None,
        }
    }

    pub(crate) const fn with_player(current: Color) -> Self {
        Self {
            current,
            chain: None,
        }
    }

    #[inline]
    pub const fn current(&self) -> Color {
        self.current
    }

    /// Square of the piece that must continue capturing, if a chain is active.
    #[inline]
    pub const fn chain_square(&self) -> Option<Square> {
        self.chain
    }

    #[inline]
    pub const fn is_chain_active(&self) -> bool {
        self.chain.is_some()
    }

    pub(crate) fn pass_turn(&mut self) {
        self.current = self.current.opponent();
        self.chain = None;
        debug!(player = %self.current, "turn passed");
    }

    pub(crate) fn continue_chain(&mut self, square: Square) {
        self.chain = Some(square);
        debug!(player = %self.current, %square, "capture chain continues");
    }

    /// Server-originated synchronization. Returns whether the player changed.
    ///
    /// Changing the player abandons an in-progress chain.
    pub(crate) fn force_player(&mut self, player: Color) -> bool {
        if self.current == player {
            return false;
        }
        if let Some(square) = self.chain.take() {
            info!(%square, "abandoning capture chain on forced turn change");
        }
        info!(from = %self.current, to = %player, "turn forced");
        self.current = player;
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
