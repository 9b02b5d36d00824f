//! Stone colours.
//!
//! The two colours on the board. `Black` is the first colour and always
//! moves first; `White` is the second.

use serde::{Deserialize, Serialize};

/// A stone colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    /// First colour. Moves first.
    Black,
    /// Second colour.
    White,
}

impl Stone {
    /// Both colours in move order.
    pub const ALL: [Stone; 2] = [Stone::Black, Stone::White];

    /// The other colour.
    ///
    /// ```
    /// use rust_gomoku::core::Stone;
    ///
    /// assert_eq!(Stone::Black.other(), Stone::White);
    /// assert_eq!(Stone::White.other(), Stone::Black);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Lowercase colour name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stone::Black => "black",
            Stone::White => "white",
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
