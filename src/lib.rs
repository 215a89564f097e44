//! Terminal checkers client
//!
//! Local hot-seat play, play against a computer opponent, and online play
//! against the authoritative server in the `backend` crate.

pub mod core;
pub mod game;
pub mod networking;
pub mod ui;
