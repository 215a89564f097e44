//! Game front ends built on the rules engine
//!
//! - `ai` - computer opponent policies
//! - `events` - what a front end reports to the user
//! - `local` - hot-seat and computer games on one machine

pub mod ai;
pub mod events;
pub mod local;

pub use ai::{MovePolicy, RandomPolicy};
pub use events::GameEvent;
pub use local::LocalMatch;
