//! gomoku - five-in-a-row server and local game.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_gomoku::client::GameClient;
use rust_gomoku::config::AppConfig;
use rust_gomoku::core::Stone;
use rust_gomoku::protocol::ClientHandler;
use rust_gomoku::render::Style;
use rust_gomoku::server::GameServer;
use rust_gomoku::session::{Participant, SessionRegistry};

/// Five-in-a-row server with a computer opponent
#[derive(Parser, Debug)]
#[command(name = "gomoku")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, default_value = "gomoku.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the TCP game server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Number of rooms
        #[arg(long)]
        rooms: Option<u32>,
    },

    /// Play the computer in this terminal
    Play {
        /// Search depth
        #[arg(short, long)]
        depth: Option<u32>,

        /// Play white; the computer opens
        #[arg(long)]
        white: bool,
    },

    /// Connect to a running server from this terminal
    Connect {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Nickname to play under
        #[arg(short, long, default_value = "anonymous")]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        Command::Serve { host, port, rooms } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(rooms) = rooms {
                config.server.rooms = rooms;
            }
            config.validate()?;
            init_tracing(&config, "info");
            run_server(config)
        }
        Command::Play { depth, white } => {
            if let Some(depth) = depth {
                config.search.max_depth = depth;
            }
            config.validate()?;
            init_tracing(&config, "warn");
            run_local(config, if white { Stone::White } else { Stone::Black })
        }
        Command::Connect { host, port, name } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config, "warn");
            run_client(&config, &name)
        }
    }
}

/// Load the config file under a temporary stderr subscriber, so warnings
/// raised before the configured filter is known still reach the user.
fn load_config(path: &Path) -> Result<AppConfig> {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, || AppConfig::load_or_default(path))
        .with_context(|| format!("loading {}", path.display()))
}

fn init_tracing(config: &AppConfig, fallback: &str) {
    let directive = config.log_filter.as_deref().unwrap_or(fallback);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .with_writer(io::stderr)
        .init();
}

fn run_server(config: AppConfig) -> Result<()> {
    let addr = config.server.bind_addr();
    info!(%addr, rooms = config.server.rooms, "starting gomoku server");
    GameServer::new(config)
        .run()
        .with_context(|| format!("serving on {addr}"))
}

fn run_client(config: &AppConfig, name: &str) -> Result<()> {
    let addr = config.server.bind_addr();
    let client = GameClient::connect(addr.as_str(), name).with_context(|| format!("connecting to {addr}"))?;
    client.run(io::stdin().lock(), io::stdout())?;
    Ok(())
}

fn run_local(config: AppConfig, human: Stone) -> Result<()> {
    let registry = Arc::new(SessionRegistry::new(config.server.seed));
    let mut handler = ClientHandler::new(registry, Participant::new("you"))
        .with_scheme(config.server.coord_scheme)
        .with_style(Style::from_color(config.server.color))
        .with_search(config.search.clone());

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", handler.play_computer(human).text)?;
    stdout.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let reply = handler.handle_line(&line);
        if !reply.text.is_empty() {
            writeln!(stdout, "{}", reply.text)?;
            stdout.flush()?;
        }
        if reply.close {
            break;
        }
    }
    Ok(())
}
