//! Terminal front end
//!
//! - **board_display**: text rendering of the board
//! - **input**: parsing of typed commands
//! - [`Presenter`]: writes [`GameEvent`]s as text or, with `--json`, as one
//!   JSON object per line

pub mod board_display;
pub mod input;

use std::io::Write;

use checkers_engine::Game;

use crate::game::events::GameEvent;
use board_display::{render_board, square_label};

pub struct Presenter<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn event(&mut self, event: &GameEvent) -> std::io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, event)?;
            return writeln!(self.out);
        }
        writeln!(self.out, "{}", describe(event))
    }

    /// Board is only drawn in text mode.
    pub fn board(&mut self, game: &Game) -> std::io::Result<()> {
        if self.json {
            return Ok(());
        }
        write!(self.out, "{}", render_board(game))
    }

    /// Free-form text, suppressed in JSON mode.
    pub fn message(&mut self, text: &str) -> std::io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "{text}")
    }
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::MoveApplied {
            by,
            from,
            to,
            captured,
            promoted,
            chain_continues,
            ..
        } => {
            let mut text = format!("{by}: {} -> {}", square_label(*from), square_label(*to));
            if let Some(square) = captured {
                text.push_str(&format!(", captures {}", square_label(*square)));
            }
            if *promoted {
                text.push_str(", crowned");
            }
            if *chain_continues {
                text.push_str(", must keep capturing");
            }
            text
        }
        GameEvent::GameOver {
            winner: Some(color),
            surrendered: Some(_),
        } => format!("{color} wins by surrender"),
        GameEvent::GameOver {
            winner: Some(color),
            ..
        } => format!("{color} wins"),
        GameEvent::GameOver { winner: None, .. } => "Draw".to_string(),
        GameEvent::Searching => "Waiting for an opponent...".to_string(),
        GameEvent::SearchCancelled => "Search cancelled".to_string(),
        GameEvent::Paired { color } => format!("Opponent found, you play {color}"),
        GameEvent::Started => "Game started".to_string(),
        GameEvent::Clock {
            white_secs,
            black_secs,
            turn,
        } => format!(
            "Clock  White {}  Black {}  ({turn} to move)",
            clock_label(*white_secs),
            clock_label(*black_secs)
        ),
        GameEvent::OpponentLeft => "Opponent left the game, you win".to_string(),
        GameEvent::SessionEnded { reason: Some(reason) } => format!("Session ended: {reason}"),
        GameEvent::SessionEnded { reason: None } => "You left the game".to_string(),
        GameEvent::Rejected { code } => format!("Rejected: {code}"),
    }
}

fn clock_label(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
