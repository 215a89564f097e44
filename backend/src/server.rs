//! TCP accept loop

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::connection;
use crate::matchmaking::Matchmaker;
use crate::registry::SessionRegistry;

pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    registry: Arc<SessionRegistry>,
}

impl Server {
    /// Bind the listening socket. Use port `0` to let the OS pick one.
    pub async fn bind(config: ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.bind).await?;
        Ok(Self {
            listener,
            config,
            registry: Arc::new(SessionRegistry::new()),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Active sessions, shared with every running session.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accept clients until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let matchmaker = Matchmaker::spawn(self.config.timing(), Arc::clone(&self.registry));
        info!(addr = %self.local_addr()?, "server listening");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(sessions = self.registry.len(), "server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(err) => {
                            warn!(%err, "accept failed");
                            continue;
                        }
                    };
                    if let Err(err) = stream.set_nodelay(true) {
                        debug!(%peer, %err, "could not disable nagle");
                    }
                    debug!(%peer, "accepted connection");

                    let matchmaker = matchmaker.clone();
                    let max_line = self.config.max_line;
                    tokio::spawn(async move {
                        if let Err(err) = connection::serve(stream, matchmaker, max_line).await {
                            warn!(%peer, %err, "connection closed with error");
                        }
                    });
                }
            }
        }
    }
}
