//! End-to-end session tests over real TCP sockets.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use backend::{Server, ServerConfig, SessionRegistry};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

struct TestServer {
    addr: SocketAddr,
    registry: Arc<SessionRegistry>,
    shutdown: CancellationToken,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn start_server() -> TestServer {
    let config = ServerConfig {
        bind: "127.0.0.1:0".parse().unwrap(),
        tick_ms: 60_000,
        start_delay_ms: 20,
        ..ServerConfig::default()
    };
    let server = Server::bind(config).await.expect("bind test server");
    let addr = server.local_addr().unwrap();
    let registry = server.registry();
    let shutdown = CancellationToken::new();
    tokio::spawn(server.run(shutdown.clone()));
    TestServer {
        addr,
        registry,
        shutdown,
    }
}

struct Client {
    framed: Framed<TcpStream, LinesCodec>,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        Self {
            framed: Framed::new(stream, LinesCodec::new()),
        }
    }

    async fn send(&mut self, line: &str) {
        self.framed.send(line.to_string()).await.expect("send");
    }

    /// Next frame that is not a clock update.
    async fn recv(&mut self) -> String {
        loop {
            let line = timeout(WAIT, self.framed.next())
                .await
                .expect("frame within timeout")
                .expect("connection open")
                .expect("valid frame");
            if !line.starts_with("TIME_UPDATE:") {
                return line;
            }
        }
    }

    async fn expect_closed(&mut self) {
        loop {
            match timeout(WAIT, self.framed.next()).await.expect("close within timeout") {
                None | Some(Err(_)) => return,
                Some(Ok(line)) if line.starts_with("TIME_UPDATE:") => continue,
                Some(Ok(line)) => panic!("unexpected frame {line}"),
            }
        }
    }
}

/// Pair two fresh clients and wait for the game to start. Returns
/// `(white, black)`.
async fn paired(addr: SocketAddr) -> (Client, Client) {
    let mut first = Client::connect(addr).await;
    let mut second = Client::connect(addr).await;

    first.send("FIND_GAME").await;
    assert_eq!(first.recv().await, "WAITING");
    second.send("FIND_GAME").await;

    let first_color = first.recv().await;
    let second_color = second.recv().await;
    assert_eq!(first.recv().await, "GAME_STARTED");
    assert_eq!(second.recv().await, "GAME_STARTED");

    match (first_color.as_str(), second_color.as_str()) {
        ("GAME_FOUND:WHITE", "GAME_FOUND:BLACK") => (first, second),
        ("GAME_FOUND:BLACK", "GAME_FOUND:WHITE") => (second, first),
        other => panic!("unexpected colors {other:?}"),
    }
}

async fn wait_until_empty(registry: &SessionRegistry) {
    timeout(WAIT, async {
        while !registry.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("registry drained");
}

#[tokio::test]
async fn test_pairing_and_move_relay() {
    let server = start_server().await;
    let (mut white, mut black) = paired(server.addr).await;
    assert_eq!(server.registry.len(), 1);

    white.send("MOVE:0,5->1,4").await;
    assert_eq!(black.recv().await, "OPPONENT_MOVE:0,5->1,4");

    white.send("MOVE:2,5->3,4").await;
    assert_eq!(white.recv().await, "ERROR:NOT_YOUR_TURN");

    black.send("MOVE:1,2->1,3").await;
    assert_eq!(black.recv().await, "ERROR:ILLEGAL_SHAPE");

    black.send("MOVE:1,2->2,3").await;
    assert_eq!(white.recv().await, "OPPONENT_MOVE:1,2->2,3");
}

#[tokio::test]
async fn test_clock_updates_follow_accepted_moves() {
    let server = start_server().await;
    let (mut white, mut black) = paired(server.addr).await;

    white.send("MOVE:0,5->1,4").await;
    assert_eq!(black.recv().await, "OPPONENT_MOVE:0,5->1,4");

    let line = timeout(WAIT, black.framed.next()).await.unwrap().unwrap().unwrap();
    let update = shared::ServerResponse::parse(&line).expect("valid response");
    match update {
        shared::ServerResponse::TimeUpdate(clock) => {
            assert_eq!(clock.turn, shared::WireColor::Black);
            assert_eq!(clock.black_secs, 0);
        }
        other => panic!("expected a clock update, got {other}"),
    }
}

#[tokio::test]
async fn test_cancel_search_twice() {
    let server = start_server().await;
    let mut client = Client::connect(server.addr).await;

    client.send("FIND_GAME").await;
    assert_eq!(client.recv().await, "WAITING");
    client.send("CANCEL_SEARCH").await;
    assert_eq!(client.recv().await, "SEARCH_CANCELLED");

    // The second cancel is silent, so the next frame answers the move
    client.send("CANCEL_SEARCH").await;
    client.send("MOVE:0,5->1,4").await;
    assert_eq!(client.recv().await, "ERROR:NO_SESSION");
    assert!(server.registry.is_empty());
}

#[tokio::test]
async fn test_disconnect_credits_opponent() {
    let server = start_server().await;
    let (white, mut black) = paired(server.addr).await;

    drop(white);
    assert_eq!(black.recv().await, "OPPONENT_QUIT");
    wait_until_empty(&server.registry).await;

    // Back to idle: a move has no session
    black.send("MOVE:1,2->2,3").await;
    assert_eq!(black.recv().await, "ERROR:NO_SESSION");
}

#[tokio::test]
async fn test_quit_then_pair_again() {
    let server = start_server().await;
    let (mut white, mut black) = paired(server.addr).await;

    black.send("QUIT").await;
    assert_eq!(white.recv().await, "OPPONENT_QUIT");
    assert_eq!(black.recv().await, "SESSION_ENDED");
    wait_until_empty(&server.registry).await;

    white.send("FIND_GAME").await;
    assert_eq!(white.recv().await, "WAITING");
    black.send("FIND_GAME").await;
    let colors = [white.recv().await, black.recv().await];
    assert!(colors.contains(&"GAME_FOUND:WHITE".to_string()));
    assert!(colors.contains(&"GAME_FOUND:BLACK".to_string()));
    assert_eq!(white.recv().await, "GAME_STARTED");
    assert_eq!(black.recv().await, "GAME_STARTED");
    assert_eq!(server.registry.len(), 1);
}

#[tokio::test]
async fn test_end_session_closes_and_credits_opponent() {
    let server = start_server().await;
    let (mut white, mut black) = paired(server.addr).await;

    white.send("END_SESSION").await;
    assert_eq!(black.recv().await, "OPPONENT_QUIT");
    white.expect_closed().await;
    wait_until_empty(&server.registry).await;
}

#[tokio::test]
async fn test_commands_rejected_by_state() {
    let server = start_server().await;
    let (mut white, _black) = paired(server.addr).await;

    white.send("FIND_GAME").await;
    assert_eq!(white.recv().await, "ERROR:ALREADY_IN_GAME");
    white.send("JUMP:0,5->1,4").await;
    assert_eq!(white.recv().await, "ERROR:UNKNOWN_COMMAND");
    white.send("MOVE:0,5").await;
    assert_eq!(white.recv().await, "ERROR:MALFORMED_MOVE");
    white.send("MOVE:0,0->1,1").await;
    assert_eq!(white.recv().await, "ERROR:NO_PIECE");
}

#[tokio::test]
async fn test_concurrent_sessions_are_independent() {
    let server = start_server().await;
    let (mut white_a, mut black_a) = paired(server.addr).await;
    let (mut white_b, mut black_b) = paired(server.addr).await;
    assert_eq!(server.registry.len(), 2);

    let game_a = async {
        white_a.send("MOVE:0,5->1,4").await;
        assert_eq!(black_a.recv().await, "OPPONENT_MOVE:0,5->1,4");
        black_a.send("MOVE:3,2->2,3").await;
        assert_eq!(white_a.recv().await, "OPPONENT_MOVE:3,2->2,3");
    };
    let game_b = async {
        white_b.send("MOVE:6,5->7,4").await;
        assert_eq!(black_b.recv().await, "OPPONENT_MOVE:6,5->7,4");
        black_b.send("MOVE:5,2->4,3").await;
        assert_eq!(white_b.recv().await, "OPPONENT_MOVE:5,2->4,3");
    };
    tokio::join!(game_a, game_b);

    // A's white captures; B is untouched by it
    white_a.send("MOVE:1,4->3,2").await;
    assert_eq!(black_a.recv().await, "OPPONENT_MOVE:1,4->3,2");
    white_b.send("MOVE:1,4->3,2").await;
    assert_eq!(white_b.recv().await, "ERROR:NO_PIECE");
    assert_eq!(server.registry.len(), 2);
}
