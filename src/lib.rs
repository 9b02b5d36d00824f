//! # rust-gomoku
//!
//! A five-in-a-row game server with a computer opponent.
//!
//! ## Design Principles
//!
//! 1. **One Lock Per Session**: Every session serializes its own
//!    operations behind a mutex. Sessions never share a lock, and the
//!    registry never holds its own locks while taking a session's.
//!
//! 2. **Search Owns Its Board**: The engine copies the position it is given
//!    and places trial stones through a guard that retracts them, so the
//!    caller's board is never touched.
//!
//! 3. **Notation at the Edge**: Boards and sessions speak [`core::Coord`].
//!    Letter-number labels and the legacy one-digit-per-axis form are
//!    parsed and printed only by `notation`, `protocol` and `render`.
//!
//! ## Modules
//!
//! - `core`: Stones, coordinates, the board, RNG
//! - `search`: Candidate generation, pattern scoring, alpha-beta minimax
//! - `session`: Seats, lifecycle, turn enforcement, registry
//! - `notation`: Coordinate parsing and formatting
//! - `render`: Text boards and notices
//! - `protocol`: Client commands and the per-connection handler
//! - `server`: TCP listener, thread per connection
//! - `client`: Terminal client relaying lines to a server
//! - `config`: TOML configuration

pub mod client;
pub mod config;
pub mod core;
pub mod notation;
pub mod protocol;
pub mod render;
pub mod search;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use crate::core::{Board, Coord, GameRng, Stone, BOARD_SIZE, WIN_LENGTH};

pub use crate::search::{select_move, SearchConfig, SearchEngine, SearchStats};

pub use crate::session::{
    MoveOutcome, Notice, Participant, ParticipantId, ReadyStatus, RematchStatus, Session, SessionError, SessionId,
    SessionRegistry, SessionSnapshot, SessionState,
};

pub use crate::config::{AppConfig, ConfigError};
pub use crate::notation::{CoordScheme, NotationError};
pub use crate::protocol::{ClientHandler, Command, Reply};
pub use crate::client::GameClient;
pub use crate::server::GameServer;
