//! Online play against the authoritative server.

pub mod client;

pub use client::{run_online, OnlineGame, ServerLink};
