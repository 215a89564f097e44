//! Network client
//!
//! [`ServerLink`] is the framed TCP connection to the server. [`OnlineGame`]
//! keeps an advisory copy of the game: our own moves are checked and applied
//! locally before they are sent, and relayed opponent moves are applied as
//! they arrive. The server's copy stays authoritative; clock updates carry
//! the side on move and are used to resynchronize the local turn. A move the
//! server refuses is rolled back to the game as it was before it.

use std::io::Write;

use checkers_engine::{Color, Game, Square};
use futures::{SinkExt, StreamExt};
use shared::{ClientCommand, MoveData, ServerResponse, TimeUpdate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, info, warn};

use crate::core::{ClientError, ClientResult};
use crate::game::events::GameEvent;
use crate::ui::board_display::square_label;
use crate::ui::input::{parse_command, UserCommand, HELP};
use crate::ui::Presenter;

/// Framed connection to the server.
pub struct ServerLink {
    framed: Framed<TcpStream, LinesCodec>,
}

impl ServerLink {
    pub async fn connect(addr: impl ToSocketAddrs) -> ClientResult<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        info!(peer = ?stream.peer_addr().ok(), "connected to server");
        Ok(Self {
            framed: Framed::new(stream, LinesCodec::new()),
        })
    }

    pub async fn send(&mut self, command: &ClientCommand) -> ClientResult<()> {
        debug!(%command, "sending");
        self.framed.send(command.to_string()).await?;
        Ok(())
    }

    /// Next decoded response.
    ///
    /// # Errors
    ///
    /// [`ClientError::ConnectionClosed`] once the server hangs up.
    pub async fn recv(&mut self) -> ClientResult<ServerResponse> {
        let line = self
            .framed
            .next()
            .await
            .ok_or(ClientError::ConnectionClosed)??;
        debug!(%line, "received");
        Ok(ServerResponse::parse(&line)?)
    }
}

/// Client-side view of an online game.
#[derive(Debug, Default)]
pub struct OnlineGame {
    engine: Game,
    color: Option<Color>,
    started: bool,
    searching: bool,
    clock: Option<TimeUpdate>,
    /// Game before our oldest move the server has not confirmed yet.
    unconfirmed: Option<Game>,
}

impl OnlineGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &Game {
        &self.engine
    }

    /// Our color while paired.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn clock(&self) -> Option<TimeUpdate> {
        self.clock
    }

    /// Whether a move of ours is applied locally but not yet confirmed.
    pub fn has_unconfirmed_move(&self) -> bool {
        self.unconfirmed.is_some()
    }

    pub fn is_my_turn(&self) -> bool {
        self.started && self.color == Some(self.engine.current_player())
    }

    /// Check and apply our own move locally, returning the command to send.
    ///
    /// The second and later captures of a chain go out as
    /// `CAPTURE_CONTINUED`.
    pub fn prepare_move(
        &mut self,
        from: Square,
        to: Square,
    ) -> ClientResult<(ClientCommand, GameEvent)> {
        let color = self.color.filter(|_| self.started).ok_or(ClientError::NoGame)?;
        if !self.is_my_turn() {
            return Err(ClientError::NotYourTurn);
        }

        let continuing = self.engine.chain_square().is_some();
        let before = self.engine.clone();
        let report = self.engine.submit_move(from, to)?;
        self.unconfirmed.get_or_insert(before);
        let data = MoveData::new(from, to);
        let command = if continuing {
            ClientCommand::CaptureContinued(data)
        } else {
            ClientCommand::Move(data)
        };
        Ok((command, GameEvent::move_applied(color, &report)))
    }

    /// Update the local view from a server response.
    pub fn apply(&mut self, response: ServerResponse) -> Vec<GameEvent> {
        match response {
            ServerResponse::Waiting => {
                self.searching = true;
                vec![GameEvent::Searching]
            }
            ServerResponse::SearchCancelled => {
                self.searching = false;
                vec![GameEvent::SearchCancelled]
            }
            ServerResponse::GameFound(color) => {
                let color = Color::from(color);
                info!(%color, "paired");
                self.searching = false;
                self.started = false;
                self.clock = None;
                self.unconfirmed = None;
                self.color = Some(color);
                self.engine.reset();
                vec![GameEvent::Paired { color }]
            }
            ServerResponse::GameStarted => {
                self.started = true;
                vec![GameEvent::Started]
            }
            ServerResponse::OpponentMove(data) | ServerResponse::OpponentCaptureContinued(data) => {
                self.apply_opponent_move(data)
            }
            ServerResponse::TimeUpdate(update) => {
                self.clock = Some(update);
                self.sync_turn(Color::from(update.turn));
                vec![GameEvent::clock(update)]
            }
            ServerResponse::OpponentQuit => {
                self.finish();
                vec![GameEvent::OpponentLeft]
            }
            ServerResponse::SessionEnded(reason) => {
                self.finish();
                vec![GameEvent::session_ended(reason.as_ref())]
            }
            ServerResponse::Error(code) => {
                if is_move_rejection(&code) {
                    if let Some(before) = self.unconfirmed.take() {
                        warn!(%code, "move refused by server, restoring local game");
                        self.engine = before;
                    }
                }
                vec![GameEvent::Rejected { code }]
            }
        }
    }

    /// Clock updates queued before the server saw our last move still show
    /// the old turn; they are skipped until one matches the local game.
    fn sync_turn(&mut self, turn: Color) {
        if !self.started {
            return;
        }
        if self.unconfirmed.is_some() {
            if turn == self.engine.current_player() {
                self.unconfirmed = None;
            }
            return;
        }
        if self.engine.force_current_player(turn) {
            warn!(%turn, "local turn resynchronized from server clock");
        }
    }

    fn apply_opponent_move(&mut self, data: MoveData) -> Vec<GameEvent> {
        self.unconfirmed = None;
        let by = self.engine.current_player();
        if Some(by) == self.color {
            warn!(mv = %data, "opponent move while local game expects ours");
        }
        match self.engine.submit_move(data.from, data.to) {
            Ok(report) => vec![GameEvent::move_applied(by, &report)],
            Err(err) => {
                warn!(mv = %data, %err, "relayed move does not fit the local game");
                vec![GameEvent::Rejected {
                    code: err.code().to_string(),
                }]
            }
        }
    }

    fn finish(&mut self) {
        self.unconfirmed = None;
        self.started = false;
        self.searching = false;
        self.color = None;
    }
}

/// Error codes the server answers to other commands than a move.
fn is_move_rejection(code: &str) -> bool {
    !matches!(
        code,
        "ALREADY_IN_GAME" | "UNKNOWN_COMMAND" | "EMPTY_FRAME" | "FRAME_TOO_LONG"
    )
}

/// Interactive online session: typed commands from `input`, server
/// responses from `link`, everything reported through `presenter`.
pub async fn run_online<R, W>(
    mut link: ServerLink,
    input: R,
    presenter: &mut Presenter<W>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut game = OnlineGame::new();
    let mut lines = input.lines();
    presenter.message("Connected. Type 'find' to look for an opponent or 'help' for commands.")?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    link.send(&ClientCommand::EndSession).await?;
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match handle_input(&line, &mut game, &mut link, presenter).await {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    Err(ClientError::Io(err)) => return Err(err.into()),
                    Err(ClientError::ConnectionClosed) => return Ok(()),
                    Err(err) => presenter.message(&err.to_string())?,
                }
            }
            response = link.recv() => {
                let response = match response {
                    Ok(response) => response,
                    Err(ClientError::ConnectionClosed) => {
                        presenter.message("Server closed the connection")?;
                        return Ok(());
                    }
                    Err(ClientError::Protocol(err)) => {
                        warn!(%err, "undecodable frame from server");
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };
                let refused = matches!(response, ServerResponse::Error(_)) && game.has_unconfirmed_move();
                let moved = refused
                    || matches!(
                        response,
                        ServerResponse::OpponentMove(_)
                            | ServerResponse::OpponentCaptureContinued(_)
                            | ServerResponse::GameStarted
                    );
                for event in game.apply(response) {
                    presenter.event(&event)?;
                }
                if moved {
                    presenter.board(game.engine())?;
                }
            }
        }
    }
}

/// Returns `Ok(false)` when the user asked to leave.
async fn handle_input<W: Write>(
    line: &str,
    game: &mut OnlineGame,
    link: &mut ServerLink,
    presenter: &mut Presenter<W>,
) -> ClientResult<bool> {
    match parse_command(line)? {
        UserCommand::Move { from, to } => {
            let (command, event) = game.prepare_move(from, to)?;
            link.send(&command).await?;
            presenter.event(&event)?;
            presenter.board(game.engine())?;
        }
        UserCommand::Find => link.send(&ClientCommand::FindGame).await?,
        UserCommand::Cancel => link.send(&ClientCommand::CancelSearch).await?,
        UserCommand::Quit | UserCommand::Surrender => link.send(&ClientCommand::Quit).await?,
        UserCommand::Exit => {
            link.send(&ClientCommand::EndSession).await?;
            return Ok(false);
        }
        UserCommand::Board => presenter.board(game.engine())?,
        UserCommand::Moves => {
            let Some(color) = game.color() else {
                return Err(ClientError::NoGame);
            };
            let listed: Vec<String> = game
                .engine()
                .legal_moves(color)
                .iter()
                .map(|mv| format!("{}->{}", square_label(mv.from), square_label(mv.to)))
                .collect();
            presenter.message(&listed.join("  "))?;
        }
        UserCommand::Help => presenter.message(HELP)?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_engine::Piece;
    use shared::{EndReason, WireColor};

    fn started_as(color: Color, engine: Game) -> OnlineGame {
        OnlineGame {
            engine,
            color: Some(color),
            started: true,
            ..OnlineGame::default()
        }
    }

    #[test]
    fn test_chain_continuation_is_sent_as_capture_continued() {
        let engine = Game::from_position(
            [
                (Square::new(5, 2), Piece::man(Color::White)),
                (Square::new(4, 3), Piece::man(Color::Black)),
                (Square::new(2, 3), Piece::man(Color::Black)),
                (Square::new(0, 7), Piece::man(Color::Black)),
            ],
            Color::White,
        )
        .unwrap();
        let mut game = started_as(Color::White, engine);

        let (first, _) = game.prepare_move(Square::new(5, 2), Square::new(3, 4)).unwrap();
        assert_eq!(first.to_string(), "MOVE:2,5->4,3");
        assert!(game.is_my_turn(), "Chain keeps the turn");

        let (second, event) = game.prepare_move(Square::new(3, 4), Square::new(1, 2)).unwrap();
        assert_eq!(second.to_string(), "CAPTURE_CONTINUED:4,3->2,1");
        assert!(matches!(event, GameEvent::MoveApplied { chain_continues: false, .. }));
        assert!(!game.is_my_turn());
    }

    #[test]
    fn test_stale_clock_does_not_undo_pending_move() {
        let mut game = OnlineGame::new();
        game.apply(ServerResponse::GameFound(WireColor::White));
        game.apply(ServerResponse::GameStarted);
        game.prepare_move(Square::new(5, 0), Square::new(4, 1)).unwrap();

        // Ticker update sent before the server processed the move
        game.apply(ServerResponse::TimeUpdate(TimeUpdate {
            white_secs: 1,
            black_secs: 0,
            turn: WireColor::White,
        }));
        assert_eq!(game.engine().current_player(), Color::Black);

        game.apply(ServerResponse::TimeUpdate(TimeUpdate {
            white_secs: 1,
            black_secs: 0,
            turn: WireColor::Black,
        }));
        game.apply(ServerResponse::OpponentMove(MoveData::new(
            Square::new(2, 1),
            Square::new(3, 2),
        )));
        assert_eq!(game.engine().current_player(), Color::White);
        assert_eq!(game.engine().piece_at(Square::new(3, 2)), Some(Piece::man(Color::Black)));
    }

    #[test]
    fn test_refused_move_is_rolled_back() {
        let mut game = OnlineGame::new();
        game.apply(ServerResponse::GameFound(WireColor::White));
        game.apply(ServerResponse::GameStarted);
        game.prepare_move(Square::new(5, 0), Square::new(4, 1)).unwrap();
        assert!(game.has_unconfirmed_move());

        // Unrelated errors leave the pending move alone
        game.apply(ServerResponse::error("ALREADY_IN_GAME"));
        assert_eq!(game.engine().current_player(), Color::Black);

        let events = game.apply(ServerResponse::error("NOT_YOUR_TURN"));
        assert_eq!(events, vec![GameEvent::Rejected { code: "NOT_YOUR_TURN".to_string() }]);
        assert_eq!(game.engine(), &Game::new(), "Local game matches the server again");
        assert!(!game.has_unconfirmed_move());
        assert!(game.is_my_turn());
    }

    #[test]
    fn test_confirmed_move_survives_later_error() {
        let mut game = OnlineGame::new();
        game.apply(ServerResponse::GameFound(WireColor::White));
        game.apply(ServerResponse::GameStarted);
        game.prepare_move(Square::new(5, 0), Square::new(4, 1)).unwrap();
        game.apply(ServerResponse::TimeUpdate(TimeUpdate {
            white_secs: 0,
            black_secs: 0,
            turn: WireColor::Black,
        }));
        assert!(!game.has_unconfirmed_move());

        game.apply(ServerResponse::error("NOT_YOUR_TURN"));
        assert_eq!(game.engine().piece_at(Square::new(4, 1)), Some(Piece::man(Color::White)));
    }

    #[test]
    fn test_moves_refused_outside_own_turn() {
        let mut game = OnlineGame::new();
        assert!(matches!(
            game.prepare_move(Square::new(5, 0), Square::new(4, 1)),
            Err(ClientError::NoGame)
        ));

        game.apply(ServerResponse::GameFound(WireColor::Black));
        assert!(matches!(
            game.prepare_move(Square::new(2, 1), Square::new(3, 2)),
            Err(ClientError::NoGame)
        ));
        game.apply(ServerResponse::GameStarted);
        assert!(matches!(
            game.prepare_move(Square::new(2, 1), Square::new(3, 2)),
            Err(ClientError::NotYourTurn)
        ));
    }

    #[test]
    fn test_session_end_returns_to_idle() {
        let mut game = OnlineGame::new();
        assert_eq!(game.apply(ServerResponse::Waiting), vec![GameEvent::Searching]);
        assert!(game.is_searching());
        game.apply(ServerResponse::GameFound(WireColor::Black));
        game.apply(ServerResponse::GameStarted);

        let events = game.apply(ServerResponse::SessionEnded(Some(EndReason::WhiteWins)));
        assert_eq!(
            events,
            vec![GameEvent::SessionEnded {
                reason: Some("WHITE_WINS".to_string())
            }]
        );
        assert_eq!(game.color(), None);
        assert!(!game.is_started());
    }
}
