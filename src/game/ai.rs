//! Computer opponent
//!
//! A [`MovePolicy`] only sees the public game API: it asks for the legal
//! moves of the side on move and picks one. The game's own validation still
//! applies when the chosen move is submitted.

use checkers_engine::{Game, Move};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses a move for the player on move.
pub trait MovePolicy {
    /// `None` when the game is over or the side on move is stuck.
    fn choose(&mut self, game: &Game) -> Option<Move>;
}

/// Uniformly random choice among captures when any exist, otherwise among
/// all legal moves.
#[derive(Debug, Clone)]
pub struct RandomPolicy<R = StdRng> {
    rng: R,
}

impl RandomPolicy<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Reproducible policy for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPolicy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MovePolicy for RandomPolicy<R> {
    fn choose(&mut self, game: &Game) -> Option<Move> {
        if game.is_over() {
            return None;
        }
        let moves = game.legal_moves(game.current_player());
        let captures: Vec<Move> = moves.iter().copied().filter(|mv| mv.is_jump).collect();
        let pool = if captures.is_empty() { moves } else { captures };
        if pool.is_empty() {
            return None;
        }
        Some(pool[self.rng.random_range(0..pool.len())])
    }
}
