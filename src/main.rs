use std::io;

use checkers_engine::Color;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use warcaby::game::{LocalMatch, RandomPolicy};
use warcaby::networking::{run_online, ServerLink};
use warcaby::ui::Presenter;

#[derive(Parser, Debug)]
#[command(name = "warcaby", about = "Checkers in the terminal")]
struct Cli {
    /// Print events as JSON lines instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Two players at one terminal
    Local,
    /// Play against the computer
    Ai {
        /// Color the computer plays
        #[arg(long, value_enum, default_value_t = Side::Black)]
        computer: Side,
        /// Seed for a reproducible opponent
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play online through a server
    Online {
        #[arg(long, env = "WARCABY_SERVER", default_value = "127.0.0.1:5000")]
        server: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with JSON events on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut presenter = Presenter::new(io::stdout(), cli.json);

    match cli.mode {
        Mode::Local => {
            LocalMatch::hot_seat().run(io::stdin().lock(), &mut presenter)?;
        }
        Mode::Ai { computer, seed } => {
            let policy = seed.map_or_else(RandomPolicy::new, RandomPolicy::seeded);
            LocalMatch::against_computer(computer.into(), policy)
                .run(io::stdin().lock(), &mut presenter)?;
        }
        Mode::Online { server } => {
            let link = ServerLink::connect(server.as_str()).await?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            run_online(link, input, &mut presenter).await?;
        }
    }
    Ok(())
}
