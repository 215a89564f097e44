//! Per-connection task
//!
//! One task per client. It reads newline-delimited frames, dispatches client
//! commands, and is the only writer of its socket: responses produced by the
//! matchmaker or a session arrive through the player's [`Outbound`] queue and
//! are written here in order.
//!
//! Connection states: `Idle → Searching → InSession → Idle`. Any exit from the
//! read loop (EOF, IO error, `END_SESSION`, an over-long frame, a full outbound
//! queue) leaves the pool and the session, crediting the opponent with the win.
//! The outbound queue is closed first, so from that moment the matchmaker and
//! sessions see the player as disconnected.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use shared::{ClientCommand, MoveData, ServerResponse};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

use crate::matchmaking::Matchmaker;
use crate::player::{Outbound, PlayerHandle, PlayerId};
use crate::session::{GameSession, LeaveKind, MoveKind};

/// Error code for frames longer than the configured limit.
const FRAME_TOO_LONG: &str = "FRAME_TOO_LONG";

enum ConnState {
    Idle,
    Searching,
    InSession(Arc<GameSession>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

struct Connection {
    handle: PlayerHandle,
    outbound: mpsc::Receiver<Outbound>,
    matchmaker: Matchmaker,
    state: ConnState,
}

/// Serve one client until it disconnects or ends its session.
pub async fn serve<S>(stream: S, matchmaker: Matchmaker, max_line: usize) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (handle, outbound) = PlayerHandle::channel();
    let mut conn = Connection {
        handle,
        outbound,
        matchmaker,
        state: ConnState::Idle,
    };
    let player = conn.id();
    let overflowed = conn.handle.overflowed();
    info!(%player, "client connected");

    let result = tokio::select! {
        result = conn.run(stream, max_line) => result,
        _ = overflowed.cancelled() => {
            warn!(%player, "client not reading, closing");
            Ok(())
        }
    };
    conn.outbound.close();
    conn.leave();
    info!(player = %conn.id(), "client disconnected");
    result
}

impl Connection {
    fn id(&self) -> PlayerId {
        self.handle.id()
    }

    async fn run<S>(&mut self, stream: S, max_line: usize) -> anyhow::Result<()>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(max_line));
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        loop {
            // Queued items first: a detach must be seen before the next command
            tokio::select! {
                biased;

                Some(item) = self.outbound.recv() => {
                    if let Some(frame) = self.apply(item) {
                        sink.send(frame.to_string()).await?;
                    }
                }
                frame = lines.next() => match frame {
                    Some(Ok(line)) => {
                        debug!(player = %self.id(), %line, "received");
                        if self.handle_line(&line).await == Flow::Close {
                            self.flush(&mut sink).await?;
                            return Ok(());
                        }
                    }
                    Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                        // The framed reader stops after a decode error
                        warn!(player = %self.id(), max_line, "frame too long, closing");
                        self.handle.send(ServerResponse::error(FRAME_TOO_LONG));
                        self.flush(&mut sink).await?;
                        return Ok(());
                    }
                    Some(Err(LinesCodecError::Io(err))) => return Err(err.into()),
                    None => return Ok(()),
                },
            }
        }
    }

    /// Update connection state from a queued item; returns a frame to write.
    fn apply(&mut self, item: Outbound) -> Option<ServerResponse> {
        match item {
            Outbound::Frame(frame) => return Some(frame),
            Outbound::Attach(session) => {
                debug!(player = %self.id(), session = %session.id(), "joined session");
                self.state = ConnState::InSession(session);
            }
            Outbound::Detach(id) => {
                if matches!(&self.state, ConnState::InSession(session) if session.id() == id) {
                    debug!(player = %self.id(), session = %id, "left session");
                    self.state = ConnState::Idle;
                }
            }
            Outbound::Requeue(id) => {
                if matches!(&self.state, ConnState::InSession(session) if session.id() == id) {
                    debug!(player = %self.id(), session = %id, "session abandoned, searching again");
                    self.state = ConnState::Searching;
                }
            }
        }
        None
    }

    /// Write everything already queued, then stop.
    async fn flush<W>(&mut self, sink: &mut FramedWrite<W, LinesCodec>) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while let Ok(item) = self.outbound.try_recv() {
            if let Some(frame) = self.apply(item) {
                sink.send(frame.to_string()).await?;
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match ClientCommand::parse(line) {
            Ok(command) => command,
            Err(err) => {
                warn!(player = %self.id(), %err, "protocol error");
                self.handle.send(ServerResponse::error(err.code()));
                return Flow::Continue;
            }
        };

        match command {
            ClientCommand::FindGame => self.find_game(),
            ClientCommand::Move(data) => self.submit_move(MoveKind::Move, data),
            ClientCommand::CaptureContinued(data) => {
                self.submit_move(MoveKind::CaptureContinued, data)
            }
            ClientCommand::CancelSearch => self.cancel_search().await,
            ClientCommand::Quit => {
                if let ConnState::InSession(session) = &self.state {
                    session.player_left(self.id(), LeaveKind::Quit);
                }
            }
            ClientCommand::EndSession => {
                match &self.state {
                    ConnState::InSession(session) => {
                        session.player_left(self.id(), LeaveKind::EndSession)
                    }
                    ConnState::Searching => self.matchmaker.leave(self.id()),
                    ConnState::Idle => {}
                }
                return Flow::Close;
            }
        }
        Flow::Continue
    }

    fn find_game(&mut self) {
        match self.state {
            ConnState::InSession(_) => {
                self.handle.send(ServerResponse::error("ALREADY_IN_GAME"));
            }
            ConnState::Searching => {
                self.handle.send(ServerResponse::Waiting);
            }
            ConnState::Idle => {
                self.state = ConnState::Searching;
                self.matchmaker.find_game(self.handle.clone());
            }
        }
    }

    fn submit_move(&self, kind: MoveKind, data: MoveData) {
        let ConnState::InSession(session) = &self.state else {
            warn!(player = %self.id(), "move without a session");
            self.handle.send(ServerResponse::error("NO_SESSION"));
            return;
        };
        if let Err(err) = session.submit_move(self.id(), kind, data) {
            debug!(player = %self.id(), %err, "move refused");
            self.handle.send(ServerResponse::error(err.code()));
        }
    }

    async fn cancel_search(&mut self) {
        if !matches!(self.state, ConnState::Searching) {
            debug!(player = %self.id(), "cancel while not searching ignored");
            return;
        }
        if self.matchmaker.cancel_search(self.id()).await {
            self.state = ConnState::Idle;
            self.handle.send(ServerResponse::SearchCancelled);
        } else {
            debug!(player = %self.id(), "cancel arrived after pairing");
        }
    }

    /// Leave the pool and any session. Safe to call in every state.
    fn leave(&mut self) {
        match std::mem::replace(&mut self.state, ConnState::Idle) {
            ConnState::Searching => self.matchmaker.leave(self.id()),
            ConnState::InSession(session) => session.player_left(self.id(), LeaveKind::Disconnect),
            ConnState::Idle => {}
        }
    }
}
