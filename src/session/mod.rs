//! Sessions: seats, turn order and the handshakes between two players.
//!
//! ## Lifecycle
//!
//! ```text
//! EMPTY --join--> WAITING --join--> FULL --both ready--> PLAYING --five--> OVER
//!   ^               |  ^                                   |                 |
//!   +--last leave---+  +---------- opponent leaves --------+   both rematch -+-> PLAYING
//! ```
//!
//! A [`Session`] serializes every operation behind its own mutex. The
//! [`SessionRegistry`] maps ids to sessions and remembers where each
//! participant sits.
//!
//! ```
//! use rust_gomoku::core::Stone;
//! use rust_gomoku::session::{Participant, ReadyStatus, SessionRegistry};
//!
//! let registry = SessionRegistry::with_pool(1, Some(7));
//! let alice = Participant::new("alice");
//! let bob = Participant::new("bob");
//!
//! assert_eq!(registry.join(1, alice.clone()), Ok(Stone::Black));
//! assert_eq!(registry.join(1, bob.clone()), Ok(Stone::White));
//! registry.set_ready(1, alice.id).unwrap();
//! assert_eq!(registry.set_ready(1, bob.id), Ok(ReadyStatus::Started { stone: Stone::White }));
//!
//! let outcome = registry.submit_move(1, alice.id, Stone::Black, "H8").unwrap();
//! assert_eq!(outcome.next_turn, Some(Stone::White));
//! ```

pub mod error;
pub mod participant;
pub mod registry;
pub mod room;
pub mod state;

/// Session identifier (room number).
pub type SessionId = u32;

pub use error::SessionError;
pub use participant::{Notice, Participant, ParticipantId};
pub use registry::SessionRegistry;
pub use room::{
    MoveOutcome, MoveRecord, ReadyStatus, RematchStatus, SeatView, Session, SessionSnapshot, SessionSummary,
};
pub use state::SessionState;
