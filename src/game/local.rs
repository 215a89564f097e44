//! Local play
//!
//! Drives one game on this machine: two humans sharing the terminal, or a
//! human against a [`MovePolicy`]. Input is read line by line so the driver
//! works the same on a terminal and on a scripted reader.

use std::io::{BufRead, Write};

use checkers_engine::{Color, Game, Outcome, Square};
use tracing::{debug, info};

use super::ai::MovePolicy;
use super::events::GameEvent;
use crate::core::{ClientError, ClientResult};
use crate::ui::board_display::square_label;
use crate::ui::input::{parse_command, UserCommand, HELP};
use crate::ui::Presenter;

pub struct LocalMatch {
    game: Game,
    computer: Option<(Color, Box<dyn MovePolicy + Send>)>,
}

impl LocalMatch {
    /// Two humans, alternating at the same terminal.
    pub fn hot_seat() -> Self {
        Self {
            game: Game::new(),
            computer: None,
        }
    }

    /// A human against `policy`, which plays `color`.
    pub fn against_computer(color: Color, policy: impl MovePolicy + Send + 'static) -> Self {
        Self {
            game: Game::new(),
            computer: Some((color, Box::new(policy))),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn computer_to_move(&self) -> bool {
        !self.game.is_over()
            && matches!(&self.computer, Some((color, _)) if *color == self.game.current_player())
    }

    /// Apply a move for whoever is on move.
    pub fn play(&mut self, from: Square, to: Square) -> ClientResult<Vec<GameEvent>> {
        let by = self.game.current_player();
        let report = self.game.submit_move(from, to)?;
        let mut events = vec![GameEvent::move_applied(by, &report)];
        if let Some(outcome) = self.game.winner() {
            events.push(GameEvent::game_over(outcome, self.game.surrendered()));
        }
        Ok(events)
    }

    /// Let the computer play every move it owes, chains included.
    pub fn play_computer(&mut self) -> ClientResult<Vec<GameEvent>> {
        let mut events = Vec::new();
        while self.computer_to_move() {
            let Some((_, policy)) = self.computer.as_mut() else {
                break;
            };
            let Some(mv) = policy.choose(&self.game) else {
                break;
            };
            debug!(%mv, "computer move");
            events.extend(self.play(mv.from, mv.to)?);
        }
        Ok(events)
    }

    /// Surrender for the side on move.
    pub fn surrender(&mut self) -> Vec<GameEvent> {
        self.game.surrender();
        self.game
            .winner()
            .map(|outcome| GameEvent::game_over(outcome, self.game.surrendered()))
            .into_iter()
            .collect()
    }

    /// Play until the game ends or input runs out. Returns the outcome, or
    /// `None` if the players left before the end.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        presenter: &mut Presenter<W>,
    ) -> anyhow::Result<Option<Outcome>> {
        info!(computer = ?self.computer.as_ref().map(|(color, _)| *color), "local game started");
        let mut lines = input.lines();

        loop {
            for event in self.play_computer()? {
                presenter.event(&event)?;
            }
            if let Some(outcome) = self.game.winner() {
                presenter.board(&self.game)?;
                return Ok(Some(outcome));
            }

            presenter.board(&self.game)?;
            presenter.message(&format!("{} to move:", self.game.current_player()))?;
            let Some(line) = lines.next().transpose()? else {
                info!("input closed, leaving local game");
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }

            let events = match parse_command(&line) {
                Ok(UserCommand::Move { from, to }) => match self.play(from, to) {
                    Ok(events) => events,
                    Err(ClientError::IllegalMove(err)) => vec![GameEvent::Rejected {
                        code: err.code().to_string(),
                    }],
                    Err(err) => return Err(err.into()),
                },
                Ok(UserCommand::Surrender) => self.surrender(),
                Ok(UserCommand::Moves) => {
                    let moves = self.game.legal_moves(self.game.current_player());
                    let listed: Vec<String> = moves
                        .iter()
                        .map(|mv| format!("{}->{}", square_label(mv.from), square_label(mv.to)))
                        .collect();
                    presenter.message(&listed.join("  "))?;
                    continue;
                }
                Ok(UserCommand::Board) => continue,
                Ok(UserCommand::Exit) => return Ok(None),
                Ok(UserCommand::Help) => {
                    presenter.message(HELP)?;
                    continue;
                }
                Ok(UserCommand::Find | UserCommand::Cancel | UserCommand::Quit) => {
                    presenter.message("Only available in online play")?;
                    continue;
                }
                Err(err) => {
                    presenter.message(&err.to_string())?;
                    continue;
                }
            };
            for event in &events {
                presenter.event(event)?;
            }
        }
    }
}
