//! Server configuration
//!
//! Command-line flags with environment fallbacks. `main` loads a `.env` file
//! first, so any `WARCABY_*` variable can live there.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "backend", about = "Authoritative checkers server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "WARCABY_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Interval of the per-session clock broadcast, in milliseconds
    #[arg(long, env = "WARCABY_TICK_MS", default_value_t = 1000)]
    pub tick_ms: u64,

    /// Delay between `GAME_FOUND` and `GAME_STARTED`, in milliseconds
    #[arg(long, env = "WARCABY_START_DELAY_MS", default_value_t = 200)]
    pub start_delay_ms: u64,

    /// Longest accepted frame, in bytes
    #[arg(long, env = "WARCABY_MAX_LINE", default_value_t = 1024)]
    pub max_line: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            tick_ms: 1000,
            start_delay_ms: 200,
            max_line: 1024,
        }
    }
}

impl ServerConfig {
    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            tick: Duration::from_millis(self.tick_ms),
            start_delay: Duration::from_millis(self.start_delay_ms),
        }
    }
}

/// Timers every session runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub tick: Duration,
    pub start_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        ServerConfig::default().timing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let parsed = ServerConfig::parse_from(["backend"]);
        let default = ServerConfig::default();
        assert_eq!(parsed.bind, default.bind);
        assert_eq!(parsed.tick_ms, default.tick_ms);
        assert_eq!(parsed.start_delay_ms, default.start_delay_ms);
        assert_eq!(parsed.max_line, default.max_line);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::parse_from([
            "backend",
            "--bind",
            "127.0.0.1:6000",
            "--tick-ms",
            "250",
        ]);
        assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 6000)));
        assert_eq!(config.timing().tick, Duration::from_millis(250));
        assert_eq!(config.timing().start_delay, Duration::from_millis(200));
    }
}
