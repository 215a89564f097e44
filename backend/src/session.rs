//! Game sessions
//!
//! A [`GameSession`] owns the authoritative [`Game`] for one paired match.
//! Every operation takes the session's mutex for its whole duration, so moves,
//! clock broadcasts and teardown of one session are serialized while separate
//! sessions never contend.
//!
//! ## Lifecycle
//!
//! | Phase        | Entered when                                   |
//! |--------------|------------------------------------------------|
//! | `Starting`   | pairing; both players get `GAME_FOUND:<color>` |
//! | `InProgress` | start delay elapsed with both players present  |
//! | `Ended`      | win, quit, end-session or disconnect           |
//!
//! Entering `Ended` happens exactly once. The transition sends the terminal
//! notifications, cancels the clock ticker, removes the session from the
//! registry and detaches both connections.
//!
//! A session that loses a player while still `Starting` was a pairing race,
//! not a game. It ends without a result and the player still connected goes
//! back to the matchmaker, seeing only `WAITING` after its `GAME_FOUND`.
//!
//! Relayed moves are re-encoded from the parsed squares, so the opponent
//! always receives the canonical `r,c->r,c` form (`00,5` arrives as `0,5`).

use std::fmt;
use std::sync::Arc;

use checkers_engine::{Color, Game, MoveError, Outcome};
use parking_lot::Mutex;
use shared::{MoveData, ServerResponse, TimeUpdate, WireColor};
use thiserror::Error;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionTiming;
use crate::matchmaking::Matchmaker;
use crate::player::{PlayerHandle, PlayerId};
use crate::registry::SessionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which client command carried a move; decides the relayed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Move,
    CaptureContinued,
}

/// How a player left a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveKind {
    /// `QUIT`: the quitter is told `SESSION_ENDED` and keeps its connection.
    Quit,
    /// `END_SESSION`: the connection closes right after.
    EndSession,
    /// Socket closed or failed.
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    InProgress,
    Ended,
}

/// Reasons a move is refused by a session. Nothing changes on refusal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("The game has not started yet")]
    NotStarted,

    #[error("The game is over")]
    GameOver,

    #[error("Player is not part of this session")]
    NotInSession,

    #[error("It is not this player's turn")]
    NotYourTurn,

    #[error(transparent)]
    Move(#[from] MoveError),
}

impl SessionError {
    /// Reason code sent as `ERROR:<code>`.
    pub const fn code(&self) -> &'static str {
        match self {
            SessionError::NotStarted => "GAME_NOT_STARTED",
            SessionError::GameOver => "GAME_OVER",
            SessionError::NotInSession => "NOT_IN_SESSION",
            SessionError::NotYourTurn => "NOT_YOUR_TURN",
            SessionError::Move(err) => err.code(),
        }
    }
}

struct SessionState {
    engine: Game,
    phase: Phase,
    white_elapsed: Duration,
    black_elapsed: Duration,
    turn_started: Instant,
    result: Option<Outcome>,
}

impl SessionState {
    /// Stored time per color plus the running time of the side on move.
    fn clock(&self) -> TimeUpdate {
        let running = Instant::now().saturating_duration_since(self.turn_started);
        let mover = self.engine.current_player();
        let (mut white, mut black) = (self.white_elapsed, self.black_elapsed);
        match mover {
            Color::White => white += running,
            Color::Black => black += running,
        }
        TimeUpdate {
            white_secs: white.as_secs(),
            black_secs: black.as_secs(),
            turn: WireColor::from(mover),
        }
    }
}

pub struct GameSession {
    id: SessionId,
    white: PlayerHandle,
    black: PlayerHandle,
    state: Mutex<SessionState>,
    ticker: CancellationToken,
    registry: Arc<SessionRegistry>,
    matchmaker: Matchmaker,
    timing: SessionTiming,
}

impl GameSession {
    /// Pair two players with randomly assigned colors and schedule the start.
    pub fn start(
        first: PlayerHandle,
        second: PlayerHandle,
        timing: SessionTiming,
        registry: Arc<SessionRegistry>,
        matchmaker: Matchmaker,
    ) -> Arc<Self> {
        let (white, black) = if rand::random::<bool>() {
            (first, second)
        } else {
            (second, first)
        };
        Self::start_with(white, black, Game::new(), timing, registry, matchmaker)
    }

    /// Create a session with fixed colors and a given game, register it,
    /// notify both players and schedule the start.
    pub fn start_with(
        white: PlayerHandle,
        black: PlayerHandle,
        engine: Game,
        timing: SessionTiming,
        registry: Arc<SessionRegistry>,
        matchmaker: Matchmaker,
    ) -> Arc<Self> {
        let session = Arc::new(Self {
            id: SessionId::new(),
            white,
            black,
            state: Mutex::new(SessionState {
                engine,
                phase: Phase::Starting,
                white_elapsed: Duration::ZERO,
                black_elapsed: Duration::ZERO,
                turn_started: Instant::now(),
                result: None,
            }),
            ticker: CancellationToken::new(),
            registry,
            matchmaker,
            timing,
        });

        session.registry.insert(Arc::clone(&session));
        info!(
            session = %session.id,
            white = %session.white.id(),
            black = %session.black.id(),
            "session created"
        );

        for color in [Color::White, Color::Black] {
            let handle = session.handle(color);
            handle.attach(Arc::clone(&session));
            handle.send(ServerResponse::GameFound(color.into()));
        }

        let starter = Arc::clone(&session);
        tokio::spawn(async move {
            time::sleep(starter.timing.start_delay).await;
            starter.begin();
        });

        session
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Final result, including the win credited when a player leaves.
    pub fn result(&self) -> Option<Outcome> {
        self.state.lock().result
    }

    /// Stored `(white, black)` time, excluding the running turn.
    pub fn elapsed(&self) -> (Duration, Duration) {
        let state = self.state.lock();
        (state.white_elapsed, state.black_elapsed)
    }

    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        if player == self.white.id() {
            Some(Color::White)
        } else if player == self.black.id() {
            Some(Color::Black)
        } else {
            None
        }
    }

    fn handle(&self, color: Color) -> &PlayerHandle {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Send `frame` to both players. A player that can no longer take
    /// frames has dropped out and loses the game.
    fn broadcast(&self, state: &mut SessionState, frame: ServerResponse) {
        let white_ok = self.white.send(frame.clone());
        let black_ok = self.black.send(frame);
        if !white_ok {
            warn!(session = %self.id, player = %self.white.id(), "player dropped out");
            self.finish_left(state, self.white.id(), LeaveKind::Disconnect);
        } else if !black_ok {
            warn!(session = %self.id, player = %self.black.id(), "player dropped out");
            self.finish_left(state, self.black.id(), LeaveKind::Disconnect);
        }
    }

    /// Leave `Starting`: announce the game, start the clock and the ticker.
    fn begin(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.phase != Phase::Starting {
            return;
        }
        if !self.white.is_connected() || !self.black.is_connected() {
            warn!(session = %self.id, "player gone before start");
            self.abandon(&mut state, None);
            return;
        }

        state.phase = Phase::InProgress;
        state.white_elapsed = Duration::ZERO;
        state.black_elapsed = Duration::ZERO;
        state.turn_started = Instant::now();
        info!(session = %self.id, "game started");

        self.broadcast(&mut state, ServerResponse::GameStarted);
        if state.phase != Phase::InProgress {
            return;
        }
        self.spawn_ticker();
        let clock = state.clock();
        self.broadcast(&mut state, ServerResponse::TimeUpdate(clock));
    }

    /// End a session that never started. Connected players other than
    /// `leaver` are handed back to the matchmaker.
    fn abandon(&self, state: &mut SessionState, leaver: Option<PlayerId>) {
        state.phase = Phase::Ended;
        self.ticker.cancel();
        self.registry.remove(self.id);
        info!(session = %self.id, "session abandoned before start");

        for handle in [&self.white, &self.black] {
            if Some(handle.id()) != leaver && handle.is_connected() && handle.requeue(self.id) {
                debug!(session = %self.id, player = %handle.id(), "requeueing player");
                self.matchmaker.find_game(handle.clone());
            } else {
                handle.detach(self.id);
            }
        }
    }

    fn spawn_ticker(self: &Arc<Self>) {
        let session = Arc::clone(self);
        let token = self.ticker.clone();
        tokio::spawn(async move {
            let period = session.timing.tick.max(Duration::from_millis(1));
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if !session.broadcast_clock() {
                            break;
                        }
                    }
                }
            }
            debug!(session = %session.id, "clock ticker stopped");
        });
    }

    /// Returns `false` once the session is no longer running.
    fn broadcast_clock(&self) -> bool {
        let mut state = self.state.lock();
        if state.phase != Phase::InProgress {
            return false;
        }
        let clock = state.clock();
        self.broadcast(&mut state, ServerResponse::TimeUpdate(clock));
        state.phase == Phase::InProgress
    }

    /// Validate and apply a move from `player` against the authoritative game.
    ///
    /// On success the mover's clock is charged, the move is relayed to the
    /// opponent, and either the result or a fresh clock is broadcast.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] and changes nothing if the session is not
    /// running, it is not the player's turn, or the engine rejects the move.
    pub fn submit_move(
        &self,
        player: PlayerId,
        kind: MoveKind,
        data: MoveData,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        match state.phase {
            Phase::Starting => return Err(SessionError::NotStarted),
            Phase::Ended => return Err(SessionError::GameOver),
            Phase::InProgress => {}
        }
        let color = self.color_of(player).ok_or(SessionError::NotInSession)?;
        if state.engine.current_player() != color {
            return Err(SessionError::NotYourTurn);
        }

        let report = state.engine.submit_move(data.from, data.to)?;

        let now = Instant::now();
        let spent = now.saturating_duration_since(state.turn_started);
        match color {
            Color::White => state.white_elapsed += spent,
            Color::Black => state.black_elapsed += spent,
        }
        state.turn_started = now;
        debug!(session = %self.id, %color, mv = %report.mv, ?spent, "move accepted");

        let relayed = MoveData::new(report.mv.from, report.mv.to);
        let frame = match kind {
            MoveKind::Move => ServerResponse::OpponentMove(relayed),
            MoveKind::CaptureContinued => ServerResponse::OpponentCaptureContinued(relayed),
        };
        let opponent = self.handle(color.opponent());
        if !opponent.send(frame) {
            warn!(session = %self.id, player = %opponent.id(), "opponent gone while relaying");
            self.finish_left(&mut state, opponent.id(), LeaveKind::Disconnect);
            return Ok(());
        }

        match state.engine.winner() {
            Some(outcome) => {
                state.phase = Phase::Ended;
                state.result = Some(outcome);
                info!(session = %self.id, ?outcome, "game over");
                self.broadcast(&mut state, ServerResponse::SessionEnded(Some(outcome.into())));
                self.teardown();
            }
            None => {
                let clock = state.clock();
                self.broadcast(&mut state, ServerResponse::TimeUpdate(clock));
            }
        }
        Ok(())
    }

    /// A player quits, ends the session or disconnects; the other player is
    /// credited with the win. Before the start the other player is requeued
    /// instead. No-op once the session has ended.
    pub fn player_left(&self, player: PlayerId, kind: LeaveKind) {
        let mut state = self.state.lock();
        self.finish_left(&mut state, player, kind);
    }

    fn finish_left(&self, state: &mut SessionState, leaver: PlayerId, kind: LeaveKind) {
        if state.phase == Phase::Ended {
            return;
        }
        let Some(color) = self.color_of(leaver) else {
            warn!(session = %self.id, player = %leaver, "leave from unknown player ignored");
            return;
        };
        if state.phase == Phase::Starting {
            if kind == LeaveKind::Quit {
                self.handle(color).send(ServerResponse::SessionEnded(None));
            }
            self.abandon(state, Some(leaver));
            return;
        }

        state.phase = Phase::Ended;
        state.result = Some(Outcome::Winner(color.opponent()));
        info!(
            session = %self.id,
            player = %leaver,
            ?kind,
            winner = %color.opponent(),
            "player left session"
        );

        self.handle(color.opponent()).send(ServerResponse::OpponentQuit);
        if kind == LeaveKind::Quit {
            self.handle(color).send(ServerResponse::SessionEnded(None));
        }
        self.teardown();
    }

    /// Runs once, on the transition into `Ended`.
    fn teardown(&self) {
        self.ticker.cancel();
        if self.registry.remove(self.id) {
            debug!(session = %self.id, "session removed from registry");
        }
        self.white.detach(self.id);
        self.black.detach(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_engine::{Piece, Square};
    use shared::{ClientCommand, EndReason};
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::sync::mpsc::Receiver;

    use crate::player::Outbound;

    const QUIET: SessionTiming = SessionTiming {
        tick: Duration::from_secs(3600),
        start_delay: Duration::from_millis(200),
    };

    async fn next_frame(rx: &mut Receiver<Outbound>) -> ServerResponse {
        loop {
            match rx.recv().await.expect("channel open") {
                Outbound::Frame(frame) => return frame,
                Outbound::Attach(_) | Outbound::Detach(_) | Outbound::Requeue(_) => continue,
            }
        }
    }

    fn mv(from: (u8, u8), to: (u8, u8)) -> MoveData {
        MoveData::new(Square::new(from.0, from.1), Square::new(to.0, to.1))
    }

    fn time_update(white_secs: u64, black_secs: u64, turn: WireColor) -> ServerResponse {
        ServerResponse::TimeUpdate(TimeUpdate {
            white_secs,
            black_secs,
            turn,
        })
    }

    struct Fixture {
        session: Arc<GameSession>,
        registry: Arc<SessionRegistry>,
        matchmaker: Matchmaker,
        white: PlayerHandle,
        black: PlayerHandle,
        white_rx: Receiver<Outbound>,
        black_rx: Receiver<Outbound>,
    }

    fn fixture(engine: Game, timing: SessionTiming) -> Fixture {
        fixture_with_black(engine, timing, PlayerHandle::channel())
    }

    fn fixture_with_black(
        engine: Game,
        timing: SessionTiming,
        (black, black_rx): (PlayerHandle, Receiver<Outbound>),
    ) -> Fixture {
        let (white, white_rx) = PlayerHandle::channel();
        let registry = Arc::new(SessionRegistry::new());
        let matchmaker = Matchmaker::spawn(timing, registry.clone());
        let session = GameSession::start_with(
            white.clone(),
            black.clone(),
            engine,
            timing,
            registry.clone(),
            matchmaker.clone(),
        );
        Fixture {
            session,
            registry,
            matchmaker,
            white,
            black,
            white_rx,
            black_rx,
        }
    }

    /// Drain the start sequence on both sides.
    async fn started(fx: &mut Fixture) {
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::GameFound(WireColor::White));
        assert_eq!(next_frame(&mut fx.black_rx).await, ServerResponse::GameFound(WireColor::Black));
        for rx in [&mut fx.white_rx, &mut fx.black_rx] {
            assert_eq!(next_frame(rx).await, ServerResponse::GameStarted);
            assert_eq!(next_frame(rx).await, time_update(0, 0, WireColor::White));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_sequence_registers_session() {
        let mut fx = fixture(Game::new(), QUIET);
        assert!(fx.registry.contains(fx.session.id()));
        assert_eq!(fx.session.phase(), Phase::Starting);
        assert_eq!(
            fx.session.submit_move(fx.white.id(), MoveKind::Move, mv((5, 0), (4, 1))),
            Err(SessionError::NotStarted)
        );

        started(&mut fx).await;
        assert_eq!(fx.session.phase(), Phase::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_charges_mover_and_relays() {
        let mut fx = fixture(Game::new(), QUIET);
        started(&mut fx).await;

        time::advance(Duration::from_millis(3500)).await;
        fx.session
            .submit_move(fx.white.id(), MoveKind::Move, mv((5, 0), (4, 1)))
            .expect("opening move is legal");

        assert_eq!(
            next_frame(&mut fx.black_rx).await,
            ServerResponse::OpponentMove(mv((5, 0), (4, 1)))
        );
        assert_eq!(next_frame(&mut fx.black_rx).await, time_update(3, 0, WireColor::Black));
        assert_eq!(next_frame(&mut fx.white_rx).await, time_update(3, 0, WireColor::Black));
        assert_eq!(fx.session.elapsed(), (Duration::from_millis(3500), Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_moves_change_nothing() {
        let mut fx = fixture(Game::new(), QUIET);
        started(&mut fx).await;

        assert_eq!(
            fx.session.submit_move(fx.black.id(), MoveKind::Move, mv((2, 1), (3, 0))),
            Err(SessionError::NotYourTurn)
        );
        let illegal = fx
            .session
            .submit_move(fx.white.id(), MoveKind::Move, mv((5, 0), (4, 0)))
            .unwrap_err();
        assert_eq!(illegal.code(), "ILLEGAL_SHAPE");
        assert_eq!(
            fx.session.submit_move(PlayerId::new(), MoveKind::Move, mv((5, 0), (4, 1))),
            Err(SessionError::NotInSession)
        );

        assert!(matches!(fx.white_rx.try_recv(), Err(TryRecvError::Empty)));
        assert!(matches!(fx.black_rx.try_recv(), Err(TryRecvError::Empty)), "Nothing relayed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_continued_is_relayed_as_continuation() {
        let engine = Game::from_position(
            [
                (Square::new(5, 0), Piece::man(Color::White)),
                (Square::new(4, 1), Piece::man(Color::Black)),
                (Square::new(2, 3), Piece::man(Color::Black)),
                (Square::new(0, 7), Piece::man(Color::Black)),
            ],
            Color::White,
        )
        .unwrap();
        let mut fx = fixture(engine, QUIET);
        started(&mut fx).await;

        fx.session
            .submit_move(fx.white.id(), MoveKind::Move, mv((5, 0), (3, 2)))
            .unwrap();
        assert_eq!(
            next_frame(&mut fx.black_rx).await,
            ServerResponse::OpponentMove(mv((5, 0), (3, 2)))
        );
        assert_eq!(next_frame(&mut fx.black_rx).await, time_update(0, 0, WireColor::White));

        fx.session
            .submit_move(fx.white.id(), MoveKind::CaptureContinued, mv((3, 2), (1, 4)))
            .unwrap();
        assert_eq!(
            next_frame(&mut fx.black_rx).await,
            ServerResponse::OpponentCaptureContinued(mv((3, 2), (1, 4)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_winning_move_ends_session() {
        let engine = Game::from_position(
            [
                (Square::new(3, 2), Piece::man(Color::White)),
                (Square::new(4, 3), Piece::man(Color::Black)),
            ],
            Color::White,
        )
        .unwrap();
        let mut fx = fixture(engine, QUIET);
        started(&mut fx).await;

        fx.session
            .submit_move(fx.white.id(), MoveKind::Move, mv((3, 2), (5, 4)))
            .unwrap();

        let ended = ServerResponse::SessionEnded(Some(EndReason::WhiteWins));
        assert_eq!(next_frame(&mut fx.white_rx).await, ended);
        assert_eq!(next_frame(&mut fx.black_rx).await, ServerResponse::OpponentMove(mv((3, 2), (5, 4))));
        assert_eq!(next_frame(&mut fx.black_rx).await, ended);

        assert_eq!(fx.session.result(), Some(Outcome::Winner(Color::White)));
        assert!(fx.registry.is_empty(), "Ended session leaves the registry");
        assert_eq!(
            fx.session.submit_move(fx.black.id(), MoveKind::Move, mv((0, 1), (1, 0))),
            Err(SessionError::GameOver)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_broadcasts_and_stops_on_quit() {
        let timing = SessionTiming {
            tick: Duration::from_secs(1),
            start_delay: Duration::from_millis(200),
        };
        let mut fx = fixture(Game::new(), timing);
        started(&mut fx).await;

        assert_eq!(next_frame(&mut fx.white_rx).await, time_update(1, 0, WireColor::White));
        assert_eq!(next_frame(&mut fx.white_rx).await, time_update(2, 0, WireColor::White));

        fx.session.player_left(fx.black.id(), LeaveKind::Quit);
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::OpponentQuit);

        // Black still has the two ticks queued before its own notification
        let mut black_frames = Vec::new();
        loop {
            let frame = next_frame(&mut fx.black_rx).await;
            if frame == ServerResponse::SessionEnded(None) {
                break;
            }
            black_frames.push(frame);
        }
        assert_eq!(black_frames.len(), 2);

        assert!(fx.registry.is_empty());
        assert_eq!(fx.session.result(), Some(Outcome::Winner(Color::White)));
        assert!(
            time::timeout(Duration::from_secs(10), next_frame(&mut fx.white_rx))
                .await
                .is_err(),
            "Ticker must stop with the session"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_is_idempotent() {
        let mut fx = fixture(Game::new(), QUIET);
        started(&mut fx).await;

        fx.session.player_left(fx.white.id(), LeaveKind::Disconnect);
        assert_eq!(next_frame(&mut fx.black_rx).await, ServerResponse::OpponentQuit);
        assert!(matches!(fx.black_rx.recv().await, Some(Outbound::Detach(id)) if id == fx.session.id()));

        fx.session.player_left(fx.black.id(), LeaveKind::Disconnect);
        fx.session.player_left(fx.white.id(), LeaveKind::Quit);
        assert!(matches!(fx.black_rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(fx.session.result(), Some(Outcome::Winner(Color::Black)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_uses_canonical_move_text() {
        let mut fx = fixture(Game::new(), QUIET);
        started(&mut fx).await;

        let ClientCommand::Move(data) = ClientCommand::parse("MOVE:05,0->4,01").unwrap() else {
            panic!("expected a move command");
        };
        fx.session.submit_move(fx.white.id(), MoveKind::Move, data).unwrap();

        let relayed = next_frame(&mut fx.black_rx).await;
        assert_eq!(relayed.to_string(), "OPPONENT_MOVE:5,0->4,1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_player_requeues_survivor() {
        let mut fx = fixture(Game::new(), QUIET);
        drop(fx.black_rx);

        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::GameFound(WireColor::White));
        assert!(
            matches!(fx.white_rx.recv().await, Some(Outbound::Requeue(id)) if id == fx.session.id()),
            "Survivor is told its session is gone"
        );
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::Waiting);

        assert_eq!(fx.session.phase(), Phase::Ended);
        assert_eq!(fx.session.result(), None, "Nobody wins a game that never started");
        assert!(fx.registry.is_empty());
        assert!(fx.matchmaker.cancel_search(fx.white.id()).await, "Survivor is in the pool");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_before_start_requeues_opponent() {
        let mut fx = fixture(Game::new(), QUIET);
        assert_eq!(next_frame(&mut fx.black_rx).await, ServerResponse::GameFound(WireColor::Black));
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::GameFound(WireColor::White));

        fx.session.player_left(fx.black.id(), LeaveKind::Quit);
        assert_eq!(next_frame(&mut fx.black_rx).await, ServerResponse::SessionEnded(None));
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::Waiting);
        assert!(fx.matchmaker.cancel_search(fx.white.id()).await);
        assert!(!fx.matchmaker.cancel_search(fx.black.id()).await, "Quitter is not requeued");

        // The start timer finds the session already over
        time::sleep(QUIET.start_delay * 2).await;
        assert!(matches!(fx.white_rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(fx.session.result(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_player_that_stops_reading_loses() {
        let timing = SessionTiming {
            tick: Duration::from_secs(1),
            start_delay: Duration::from_millis(200),
        };
        // Room for attach, GAME_FOUND, GAME_STARTED and the first clock only
        let mut fx = fixture_with_black(Game::new(), timing, PlayerHandle::with_capacity(4));

        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::GameFound(WireColor::White));
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::GameStarted);
        assert_eq!(next_frame(&mut fx.white_rx).await, time_update(0, 0, WireColor::White));
        assert_eq!(next_frame(&mut fx.white_rx).await, time_update(1, 0, WireColor::White));
        assert_eq!(next_frame(&mut fx.white_rx).await, ServerResponse::OpponentQuit);

        assert!(!fx.black.is_connected());
        assert_eq!(fx.session.phase(), Phase::Ended);
        assert_eq!(fx.session.result(), Some(Outcome::Winner(Color::White)));
        assert!(fx.registry.is_empty());
        assert!(
            time::timeout(Duration::from_secs(10), next_frame(&mut fx.white_rx))
                .await
                .is_err(),
            "Ticker stops with the session"
        );
    }
}
