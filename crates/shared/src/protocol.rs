//! Frame codec
//!
//! Every frame is one line, `COMMAND` or `COMMAND:DATA`, split on the first
//! `:`. Only `TIME_UPDATE` carries further `:` separators inside its data.
//!
//! Move data is written **column first**: `fromCol,fromRow->toCol,toRow`.

use std::fmt;

use checkers_engine::{Color, Outcome, Square};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Separator between a command and its data.
pub const SEPARATOR: char = ':';

/// Split a frame into command and (possibly empty) data.
fn split_frame(line: &str) -> Result<(&str, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(line.split_once(SEPARATOR).unwrap_or((line, "")))
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

// ============================================================================
// Colors
// ============================================================================

/// Color as written on the wire (`WHITE` / `BLACK`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireColor {
    White,
    Black,
}

impl WireColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            WireColor::White => "WHITE",
            WireColor::Black => "BLACK",
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        match text {
            "WHITE" => Ok(WireColor::White),
            "BLACK" => Ok(WireColor::Black),
            other => Err(ProtocolError::UnknownColor(other.to_string())),
        }
    }
}

impl fmt::Display for WireColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Color> for WireColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => WireColor::White,
            Color::Black => WireColor::Black,
        }
    }
}

impl From<WireColor> for Color {
    fn from(color: WireColor) -> Self {
        match color {
            WireColor::White => Color::White,
            WireColor::Black => Color::Black,
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Source and destination of a move, encoded `fromCol,fromRow->toCol,toRow`.
///
/// Parsing only checks the format; coordinates outside the board are left
/// for the engine to reject.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveData {
    pub from: Square,
    pub to: Square,
}

impl MoveData {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn parse(data: &str) -> Result<Self> {
        let malformed = || ProtocolError::MalformedMove(data.to_string());

        let (from, to) = data.split_once("->").ok_or_else(malformed)?;
        let square = |text: &str| -> Option<Square> {
            let (col, row) = text.split_once(',')?;
            Some(Square::new(parse_number(row)?, parse_number(col)?))
        };

        Ok(Self {
            from: square(from).ok_or_else(malformed)?,
            to: square(to).ok_or_else(malformed)?,
        })
    }
}

impl fmt::Display for MoveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}->{},{}",
            self.from.col, self.from.row, self.to.col, self.to.row
        )
    }
}

/// Live clock broadcast: whole seconds used by each color and the side on move.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeUpdate {
    pub white_secs: u64,
    pub black_secs: u64,
    pub turn: WireColor,
}

impl TimeUpdate {
    /// Parse `white:black:COLOR`.
    pub fn parse(data: &str) -> Result<Self> {
        let malformed = || ProtocolError::MalformedTimeUpdate(data.to_string());

        let fields: Vec<&str> = data.split(SEPARATOR).collect();
        let [white, black, turn] = fields.as_slice() else {
            return Err(malformed());
        };
        Ok(Self {
            white_secs: parse_number(white).ok_or_else(malformed)?,
            black_secs: parse_number(black).ok_or_else(malformed)?,
            turn: WireColor::parse(turn)?,
        })
    }
}

impl fmt::Display for TimeUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.white_secs, self.black_secs, self.turn
        )
    }
}

/// Why a session ended, carried by `SESSION_ENDED:<reason>`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    WhiteWins,
    BlackWins,
    Draw,
    /// Any reason this client does not know about.
    Other(String),
}

impl EndReason {
    pub fn as_str(&self) -> &str {
        match self {
            EndReason::WhiteWins => "WHITE_WINS",
            EndReason::BlackWins => "BLACK_WINS",
            EndReason::Draw => "DRAW",
            EndReason::Other(reason) => reason,
        }
    }

    fn parse(text: &str) -> Self {
        match text {
            "WHITE_WINS" => EndReason::WhiteWins,
            "BLACK_WINS" => EndReason::BlackWins,
            "DRAW" => EndReason::Draw,
            other => EndReason::Other(other.to_string()),
        }
    }
}

impl From<Outcome> for EndReason {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(Color::White) => EndReason::WhiteWins,
            Outcome::Winner(Color::Black) => EndReason::BlackWins,
            Outcome::Draw => EndReason::Draw,
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Client → Server
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    FindGame,
    Move(MoveData),
    /// Second or later capture of a chain.
    CaptureContinued(MoveData),
    CancelSearch,
    /// Leave the session; the connection stays open.
    Quit,
    /// Leave the session and close the connection.
    EndSession,
}

impl ClientCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let (command, data) = split_frame(line)?;
        match command {
            "FIND_GAME" => Ok(ClientCommand::FindGame),
            "MOVE" => Ok(ClientCommand::Move(MoveData::parse(data)?)),
            "CAPTURE_CONTINUED" => Ok(ClientCommand::CaptureContinued(MoveData::parse(data)?)),
            "CANCEL_SEARCH" => Ok(ClientCommand::CancelSearch),
            "QUIT" => Ok(ClientCommand::Quit),
            "END_SESSION" => Ok(ClientCommand::EndSession),
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::FindGame => f.write_str("FIND_GAME"),
            ClientCommand::Move(mv) => write!(f, "MOVE{SEPARATOR}{mv}"),
            ClientCommand::CaptureContinued(mv) => write!(f, "CAPTURE_CONTINUED{SEPARATOR}{mv}"),
            ClientCommand::CancelSearch => f.write_str("CANCEL_SEARCH"),
            ClientCommand::Quit => f.write_str("QUIT"),
            ClientCommand::EndSession => f.write_str("END_SESSION"),
        }
    }
}

// ============================================================================
// Server → Client
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ServerResponse {
    Waiting,
    GameFound(WireColor),
    GameStarted,
    OpponentMove(MoveData),
    OpponentCaptureContinued(MoveData),
    TimeUpdate(TimeUpdate),
    SearchCancelled,
    OpponentQuit,
    SessionEnded(Option<EndReason>),
    /// Rejection with a machine-readable reason code.
    Error(String),
}

impl ServerResponse {
    pub fn error(code: impl Into<String>) -> Self {
        ServerResponse::Error(code.into())
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (command, data) = split_frame(line)?;
        match command {
            "WAITING" => Ok(ServerResponse::Waiting),
            "GAME_FOUND" => Ok(ServerResponse::GameFound(WireColor::parse(data)?)),
            "GAME_STARTED" => Ok(ServerResponse::GameStarted),
            "OPPONENT_MOVE" => Ok(ServerResponse::OpponentMove(MoveData::parse(data)?)),
            "OPPONENT_CAPTURE_CONTINUED" => {
                Ok(ServerResponse::OpponentCaptureContinued(MoveData::parse(data)?))
            }
            "TIME_UPDATE" => Ok(ServerResponse::TimeUpdate(TimeUpdate::parse(data)?)),
            "SEARCH_CANCELLED" => Ok(ServerResponse::SearchCancelled),
            "OPPONENT_QUIT" => Ok(ServerResponse::OpponentQuit),
            "SESSION_ENDED" if data.is_empty() => Ok(ServerResponse::SessionEnded(None)),
            "SESSION_ENDED" => Ok(ServerResponse::SessionEnded(Some(EndReason::parse(data)))),
            "ERROR" => Ok(ServerResponse::Error(data.to_string())),
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for ServerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerResponse::Waiting => f.write_str("WAITING"),
            ServerResponse::GameFound(color) => write!(f, "GAME_FOUND{SEPARATOR}{color}"),
            ServerResponse::GameStarted => f.write_str("GAME_STARTED"),
            ServerResponse::OpponentMove(mv) => write!(f, "OPPONENT_MOVE{SEPARATOR}{mv}"),
            ServerResponse::OpponentCaptureContinued(mv) => {
                write!(f, "OPPONENT_CAPTURE_CONTINUED{SEPARATOR}{mv}")
            }
            ServerResponse::TimeUpdate(update) => write!(f, "TIME_UPDATE{SEPARATOR}{update}"),
            ServerResponse::SearchCancelled => f.write_str("SEARCH_CANCELLED"),
            ServerResponse::OpponentQuit => f.write_str("OPPONENT_QUIT"),
            ServerResponse::SessionEnded(None) => f.write_str("SESSION_ENDED"),
            ServerResponse::SessionEnded(Some(reason)) => {
                write!(f, "SESSION_ENDED{SEPARATOR}{reason}")
            }
            ServerResponse::Error(code) => write!(f, "ERROR{SEPARATOR}{code}"),
        }
    }
}
