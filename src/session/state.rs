//! Session lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a session is in its lifecycle.
///
/// `Empty → Waiting → Full → Playing → Over`, with departures falling back
/// to `Waiting`/`Empty` and rematches looping `Over → Playing`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No occupants.
    #[default]
    Empty,
    /// One occupant.
    Waiting,
    /// Two occupants, not both ready.
    Full,
    /// Moves alternate.
    Playing,
    /// Someone made five.
    Over,
}

impl SessionState {
    /// Whether moves are being accepted.
    #[must_use]
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    /// State implied by the occupant count outside a game.
    #[must_use]
    pub fn for_occupants(occupants: usize) -> Self {
        match occupants {
            0 => Self::Empty,
            1 => Self::Waiting,
            _ => Self::Full,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "EMPTY",
            Self::Waiting => "WAITING",
            Self::Full => "FULL",
            Self::Playing => "PLAYING",
            Self::Over => "OVER",
        };
        f.write_str(name)
    }
}
