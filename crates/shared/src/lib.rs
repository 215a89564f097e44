//! Wire protocol shared by the checkers server and client
//!
//! Newline-delimited UTF-8 text frames of the form `COMMAND` or
//! `COMMAND:DATA`. See [`protocol`] for the typed commands and responses.

pub mod error;
pub mod protocol;

pub use error::ProtocolError;
pub use protocol::{ClientCommand, EndReason, MoveData, ServerResponse, TimeUpdate, WireColor};
