//! Board coordinates.
//!
//! `x` is the column (0 = `A`), `y` is the row (0 = `1`). Both axes run
//! `0..BOARD_SIZE`. A `Coord` can hold out-of-range values: bounds are
//! checked by the operations that consume it, never by construction, so
//! that a rejected move can be reported with the coordinate the client sent.
//!
//! ## Labels
//!
//! The canonical label is a column letter followed by a row number:
//!
//! ```
//! use rust_gomoku::core::Coord;
//!
//! assert_eq!(Coord::new(7, 7).label(), "H8");
//! assert_eq!(Coord::from_label("a1"), Some(Coord::new(0, 0)));
//! assert_eq!(Coord::from_label("P1"), None);
//! ```
//!
//! Other encodings belong in [`crate::notation`].

use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const BOARD_SIZE: usize = 15;

/// A board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column, 0-based.
    pub x: u8,
    /// Row, 0-based.
    pub y: u8,
}

impl Coord {
    /// Centre of the board.
    pub const CENTER: Coord = Coord::new((BOARD_SIZE / 2) as u8, (BOARD_SIZE / 2) as u8);

    /// Create a coordinate. Not bounds-checked.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Create from signed components, `None` when either is outside the board.
    #[must_use]
    pub fn from_signed(x: i32, y: i32) -> Option<Self> {
        let n = BOARD_SIZE as i32;
        if (0..n).contains(&x) && (0..n).contains(&y) {
            Some(Self::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Whether both axes are in `0..BOARD_SIZE`.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// Step `k` cells along `(dx, dy)`, `None` when leaving the board.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, k: i32) -> Option<Self> {
        Self::from_signed(self.x as i32 + dx * k, self.y as i32 + dy * k)
    }

    /// Signed pair, with `(-1, -1)` for "no coordinate".
    ///
    /// ```
    /// use rust_gomoku::core::Coord;
    ///
    /// assert_eq!(Coord::to_signed(Some(Coord::new(3, 4))), (3, 4));
    /// assert_eq!(Coord::to_signed(None), (-1, -1));
    /// ```
    #[must_use]
    pub fn to_signed(coord: Option<Coord>) -> (i32, i32) {
        coord.map_or((-1, -1), |c| (c.x as i32, c.y as i32))
    }

    /// Every on-board coordinate, `x` outer and `y` inner.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE as u8).flat_map(|x| (0..BOARD_SIZE as u8).map(move |y| Coord::new(x, y)))
    }

    /// Canonical label (`A1`..`O15`); `?` for off-board coordinates.
    #[must_use]
    pub fn label(self) -> String {
        if !self.in_bounds() {
            return "?".to_string();
        }
        format!("{}{}", (b'A' + self.x) as char, self.y + 1)
    }

    /// Parse a canonical label, case-insensitive.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let mut chars = label.chars();
        let column = chars.next()?.to_ascii_uppercase();
        let row: &str = chars.as_str();
        if !(1..=2).contains(&row.len()) || !row.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let x = column_index(column)?;
        let y = row_index(row)?;
        Some(Self::new(x, y))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// `A`..`O` to 0..14.
pub(crate) fn column_index(c: char) -> Option<u8> {
    let c = c.to_ascii_uppercase();
    if c.is_ascii_uppercase() && ((c as u8 - b'A') as usize) < BOARD_SIZE {
        Some(c as u8 - b'A')
    } else {
        None
    }
}

/// `1`..`15` to 0..14.
pub(crate) fn row_index(s: &str) -> Option<u8> {
    let row: usize = s.parse().ok()?;
    if (1..=BOARD_SIZE).contains(&row) {
        Some((row - 1) as u8)
    } else {
        None
    }
}
