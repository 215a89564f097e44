//! Game events
//!
//! Everything a front end reports to the user, for local and online play
//! alike. With `--json` each event is printed as one JSON object per line.

use checkers_engine::{Color, MoveReport, Outcome, Square};
use serde::Serialize;
use shared::{EndReason, TimeUpdate};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A move was applied to the local game.
    MoveApplied {
        by: Color,
        from: Square,
        to: Square,
        captured: Option<Square>,
        promoted: bool,
        chain_continues: bool,
        next_player: Color,
    },
    /// Local game finished. `winner` is `None` for a draw.
    GameOver {
        winner: Option<Color>,
        surrendered: Option<Color>,
    },
    Searching,
    SearchCancelled,
    Paired { color: Color },
    Started,
    Clock { white_secs: u64, black_secs: u64, turn: Color },
    OpponentLeft,
    /// Online session closed. `reason` is absent after our own quit.
    SessionEnded { reason: Option<String> },
    /// The server or the local engine refused something.
    Rejected { code: String },
}

impl GameEvent {
    pub fn move_applied(by: Color, report: &MoveReport) -> Self {
        GameEvent::MoveApplied {
            by,
            from: report.mv.from,
            to: report.mv.to,
            captured: report.captured.map(|(square, _)| square),
            promoted: report.promoted,
            chain_continues: report.chain_continues,
            next_player: report.next_player,
        }
    }

    pub fn game_over(outcome: Outcome, surrendered: Option<Color>) -> Self {
        GameEvent::GameOver {
            winner: outcome.winner(),
            surrendered,
        }
    }

    pub fn clock(update: TimeUpdate) -> Self {
        GameEvent::Clock {
            white_secs: update.white_secs,
            black_secs: update.black_secs,
            turn: update.turn.into(),
        }
    }

    pub fn session_ended(reason: Option<&EndReason>) -> Self {
        GameEvent::SessionEnded {
            reason: reason.map(|reason| reason.to_string()),
        }
    }
}
