use thiserror::Error;

/// Frame parsing failures. Answered with `ERROR:<code>`; the connection stays open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty frame")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Malformed move data: {0}")]
    MalformedMove(String),

    #[error("Malformed time update: {0}")]
    MalformedTimeUpdate(String),

    #[error("Unknown color: {0}")]
    UnknownColor(String),
}

impl ProtocolError {
    /// Stable reason code, used in `ERROR:<code>` responses.
    pub const fn code(&self) -> &'static str {
        match self {
            ProtocolError::Empty => "EMPTY_FRAME",
            ProtocolError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            ProtocolError::MalformedMove(_) => "MALFORMED_MOVE",
            ProtocolError::MalformedTimeUpdate(_) => "MALFORMED_TIME_UPDATE",
            ProtocolError::UnknownColor(_) => "UNKNOWN_COLOR",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
