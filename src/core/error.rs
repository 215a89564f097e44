//! Error types for the client
//!
//! Covers the terminal front end and the network client: bad user input,
//! moves the advisory engine refuses, and connection failures.

use checkers_engine::MoveError;
use shared::ProtocolError;
use thiserror::Error;

/// Errors that can occur in the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Socket or terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame from the server could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The local engine refused the move
    #[error("Illegal move: {0}")]
    IllegalMove(#[from] MoveError),

    /// A line typed by the user is not a command
    #[error("Unrecognized input: {input}")]
    InvalidInput { input: String },

    /// A move was entered while no game is running
    #[error("No game in progress")]
    NoGame,

    /// A move was entered while the opponent is on move
    #[error("Not your turn")]
    NotYourTurn,

    /// The server closed the connection
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// Framing error on the server connection
    #[error("Frame error: {0}")]
    Frame(#[from] tokio_util::codec::LinesCodecError),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
