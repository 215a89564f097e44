//! Public API for the checkers engine
//!
//! [`Game`] owns the board and turn state privately and is the only way to
//! mutate them. Local play, the computer opponent and the server all drive a
//! game through the same methods.
//!
//! ## Module Organization
//!
//! - `game` - Game lifecycle (new, reset, custom positions)
//! - `moves` - Move submission and legal-move queries
//! - `state` - State queries (current player, winner, pieces) and surrender

mod game;
mod moves;
mod state;

pub use game::Game;
