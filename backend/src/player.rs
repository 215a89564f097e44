//! Handles to connected players
//!
//! Every connection task owns the receiving half of a bounded channel and
//! hands out [`PlayerHandle`]s holding the sending half. Sessions and the
//! matchmaker only ever talk to a player through its handle, so nothing but
//! the connection task touches the socket.
//!
//! Handles never wait for room in the queue. A player whose queue fills up
//! has stopped reading and is treated as disconnected from then on.

use std::fmt;
use std::sync::Arc;

use shared::ServerResponse;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use crate::session::{GameSession, SessionId};

/// Queued items per player before it is dropped for not reading.
pub const OUTBOUND_CAPACITY: usize = 256;

/// Identifier of one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Work queued for a connection task.
pub enum Outbound {
    /// Write a frame to the socket.
    Frame(ServerResponse),
    /// The player joined a session.
    Attach(Arc<GameSession>),
    /// The session ended; drop the reference if it is still the current one.
    Detach(SessionId),
    /// The session never started; the player is back in the waiting pool.
    Requeue(SessionId),
}

impl fmt::Debug for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Frame(frame) => f.debug_tuple("Frame").field(frame).finish(),
            Outbound::Attach(session) => f.debug_tuple("Attach").field(&session.id()).finish(),
            Outbound::Detach(id) => f.debug_tuple("Detach").field(id).finish(),
            Outbound::Requeue(id) => f.debug_tuple("Requeue").field(id).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerHandle {
    id: PlayerId,
    tx: mpsc::Sender<Outbound>,
    overflowed: CancellationToken,
}

impl PlayerHandle {
    /// New handle plus the receiver its connection task drains.
    pub fn channel() -> (Self, mpsc::Receiver<Outbound>) {
        Self::with_capacity(OUTBOUND_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                id: PlayerId::new(),
                tx,
                overflowed: CancellationToken::new(),
            },
            rx,
        )
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// A player is connected while its connection task is still draining
    /// and keeping up.
    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed() && !self.overflowed.is_cancelled()
    }

    /// Cancelled once the queue has overflowed; the connection closes on it.
    pub(crate) fn overflowed(&self) -> CancellationToken {
        self.overflowed.clone()
    }

    /// Queue a frame. Returns `false` if the connection is gone or has
    /// stopped reading.
    pub fn send(&self, frame: ServerResponse) -> bool {
        self.push(Outbound::Frame(frame))
    }

    pub(crate) fn attach(&self, session: Arc<GameSession>) -> bool {
        self.push(Outbound::Attach(session))
    }

    pub(crate) fn detach(&self, session: SessionId) {
        self.push(Outbound::Detach(session));
    }

    pub(crate) fn requeue(&self, session: SessionId) -> bool {
        self.push(Outbound::Requeue(session))
    }

    fn push(&self, item: Outbound) -> bool {
        if self.overflowed.is_cancelled() {
            return false;
        }
        match self.tx.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(player = %self.id, "outbound queue full, dropping player");
                self.overflowed.cancel();
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_fails_once_receiver_is_dropped() {
        let (handle, rx) = PlayerHandle::channel();
        assert!(handle.is_connected());
        assert!(handle.send(ServerResponse::Waiting));

        drop(rx);
        assert!(!handle.is_connected());
        assert!(!handle.send(ServerResponse::Waiting));
    }

    #[test]
    fn test_full_queue_disconnects_player() {
        let (handle, mut rx) = PlayerHandle::with_capacity(2);
        let overflowed = handle.overflowed();
        assert!(handle.send(ServerResponse::GameStarted));
        assert!(handle.send(ServerResponse::Waiting));
        assert!(!overflowed.is_cancelled());

        assert!(!handle.send(ServerResponse::Waiting), "Third frame does not fit");
        assert!(overflowed.is_cancelled());
        assert!(!handle.is_connected());

        // Draining does not bring an overflowed player back
        while rx.try_recv().is_ok() {}
        assert!(!handle.send(ServerResponse::Waiting));
        assert!(!handle.clone().is_connected(), "Clones share the state");
    }
}
