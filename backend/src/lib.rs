//! Authoritative checkers server
//!
//! Clients connect over TCP and speak the line protocol from the `shared`
//! crate. The server pairs searching clients, runs one authoritative
//! [`checkers_engine::Game`] per session and relays validated moves.

pub mod config;
pub mod connection;
pub mod matchmaking;
pub mod player;
pub mod registry;
pub mod server;
pub mod session;

pub use config::{ServerConfig, SessionTiming};
pub use matchmaking::Matchmaker;
pub use player::{Outbound, PlayerHandle, PlayerId};
pub use registry::SessionRegistry;
pub use server::Server;
pub use session::{GameSession, LeaveKind, MoveKind, Phase, SessionError, SessionId};
