//! Matchmaking
//!
//! A single actor task owns the waiting pool and handles every find, cancel
//! and leave request in arrival order. Pairing two players is therefore one
//! uninterrupted step: no other request can observe or claim either of them
//! halfway through.
//!
//! A player can still vanish between pairing and the session start. The
//! session then hands the other player back through [`Matchmaker::find_game`].

use std::collections::VecDeque;
use std::sync::Arc;

use shared::ServerResponse;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::SessionTiming;
use crate::player::{PlayerHandle, PlayerId};
use crate::registry::SessionRegistry;
use crate::session::GameSession;

enum MatchRequest {
    Find(PlayerHandle),
    Cancel {
        player: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    Leave(PlayerId),
}

/// Cloneable handle to the matchmaking actor.
#[derive(Clone)]
pub struct Matchmaker {
    tx: mpsc::UnboundedSender<MatchRequest>,
}

impl Matchmaker {
    /// Spawn the actor. It stops once every handle has been dropped.
    pub fn spawn(timing: SessionTiming, registry: Arc<SessionRegistry>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, tx.downgrade(), timing, registry));
        Self { tx }
    }

    /// Pair `player` with a waiting opponent, or queue it and answer `WAITING`.
    pub fn find_game(&self, player: PlayerHandle) {
        let _ = self.tx.send(MatchRequest::Find(player));
    }

    /// Remove `player` from the pool if it is still waiting.
    ///
    /// Returns `false` when the player was not waiting, e.g. because it has
    /// just been paired.
    pub async fn cancel_search(&self, player: PlayerId) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(MatchRequest::Cancel { player, reply }).is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// Drop `player` from the pool without a reply.
    pub fn leave(&self, player: PlayerId) {
        let _ = self.tx.send(MatchRequest::Leave(player));
    }
}

#[derive(Default)]
struct WaitingPool {
    queue: VecDeque<PlayerHandle>,
}

impl WaitingPool {
    fn contains(&self, player: PlayerId) -> bool {
        self.queue.iter().any(|handle| handle.id() == player)
    }

    fn remove(&mut self, player: PlayerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|handle| handle.id() != player);
        self.queue.len() != before
    }

    /// Oldest connected player other than `player`. Disconnected players
    /// met on the way are dropped from the pool.
    fn take_opponent(&mut self, player: PlayerId) -> Option<PlayerHandle> {
        while let Some(candidate) = self.queue.pop_front() {
            if candidate.id() == player {
                continue;
            }
            if candidate.is_connected() {
                return Some(candidate);
            }
            debug!(player = %candidate.id(), "dropping disconnected player from pool");
        }
        None
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<MatchRequest>,
    this: mpsc::WeakUnboundedSender<MatchRequest>,
    timing: SessionTiming,
    registry: Arc<SessionRegistry>,
) {
    let mut pool = WaitingPool::default();

    while let Some(request) = rx.recv().await {
        match request {
            MatchRequest::Find(player) => {
                if pool.contains(player.id()) {
                    player.send(ServerResponse::Waiting);
                    continue;
                }
                if !player.is_connected() {
                    continue;
                }
                match pool.take_opponent(player.id()) {
                    Some(opponent) => {
                        // Only fails once every handle is gone
                        let Some(tx) = this.upgrade() else { break };
                        info!(first = %opponent.id(), second = %player.id(), "pairing players");
                        GameSession::start(
                            opponent,
                            player,
                            timing,
                            Arc::clone(&registry),
                            Matchmaker { tx },
                        );
                    }
                    None => {
                        debug!(player = %player.id(), "player waiting for opponent");
                        player.send(ServerResponse::Waiting);
                        pool.queue.push_back(player);
                    }
                }
            }
            MatchRequest::Cancel { player, reply } => {
                let removed = pool.remove(player);
                debug!(%player, removed, "search cancel");
                let _ = reply.send(removed);
            }
            MatchRequest::Leave(player) => {
                pool.remove(player);
            }
        }
    }
    debug!("matchmaker stopped");
}
