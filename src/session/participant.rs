//! Participants and the notices delivered to them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Board, Coord, Stone};

static NEXT_PARTICIPANT: AtomicU64 = AtomicU64::new(1);

/// Process-unique participant identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_PARTICIPANT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something that happened in a session, pushed to the other occupant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    OpponentJoined { name: String },
    OpponentReady { name: String },
    GameStarted { your_stone: Stone },
    MovePlayed {
        coord: Coord,
        stone: Stone,
        winner: Option<Stone>,
        board: Board,
    },
    OpponentLeft { name: String, game_aborted: bool },
    RematchRequested { name: String },
    RematchStarted { your_stone: Stone },
    Info(String),
}

/// A connected player.
///
/// Cloning is cheap; clones share the mailbox.
#[derive(Clone, Debug)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    mailbox: Option<Sender<Notice>>,
}

impl Participant {
    /// A participant with no mailbox; notices to it are dropped.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::next(),
            name: name.into(),
            mailbox: None,
        }
    }

    /// A participant whose notices go to `mailbox`.
    pub fn with_mailbox(name: impl Into<String>, mailbox: Sender<Notice>) -> Self {
        Self {
            mailbox: Some(mailbox),
            ..Self::new(name)
        }
    }

    /// Deliver a notice. A closed mailbox is not an error.
    pub fn notify(&self, notice: Notice) {
        if let Some(mailbox) = &self.mailbox {
            if mailbox.send(notice).is_err() {
                debug!(participant = %self.id, "mailbox closed, notice dropped");
            }
        }
    }
}
