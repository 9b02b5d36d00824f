//! Coordinate notation at the protocol boundary.
//!
//! The canonical scheme is a column letter `A`–`O` followed by a row number
//! `1`–`15` (`H8` is the centre). Clients may also send the two parts as
//! separate tokens in either order (`H 8`, `8 H`).
//!
//! The legacy scheme encodes each axis as one character, `0`–`9` then
//! `A`–`E` for 10–14, x first. It exists only for old clients and never
//! reaches board or session code.
//!
//! ```
//! use rust_gomoku::core::Coord;
//! use rust_gomoku::notation::CoordScheme;
//!
//! assert_eq!(CoordScheme::Canonical.parse(&["H8"]), Ok(Coord::new(7, 7)));
//! assert_eq!(CoordScheme::Canonical.parse(&["8", "h"]), Ok(Coord::new(7, 7)));
//! assert_eq!(CoordScheme::LegacyHex.parse(&["7", "E"]), Ok(Coord::new(7, 14)));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::coord::{column_index, row_index};
use crate::core::{Coord, BOARD_SIZE};

/// Why a coordinate could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("no coordinate given")]
    Missing,

    #[error("expected one or two coordinate tokens, got {0}")]
    TooManyTokens(usize),

    #[error("not a column letter A-O: {0:?}")]
    BadColumn(String),

    #[error("not a row number 1-15: {0:?}")]
    BadRow(String),

    #[error("not a cell label: {0:?}")]
    BadLabel(String),

    #[error("not a legacy axis digit 0-9 or A-E: {0:?}")]
    BadDigit(String),
}

/// How a connection writes coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordScheme {
    /// Letter plus number, e.g. `H8`.
    #[default]
    Canonical,
    /// One character per axis, x then y.
    LegacyHex,
}

impl CoordScheme {
    /// Parse the coordinate tokens of a `put` command.
    pub fn parse(self, tokens: &[&str]) -> Result<Coord, NotationError> {
        match (self, tokens) {
            (_, []) => Err(NotationError::Missing),
            (Self::Canonical, [label]) => parse_label(label),
            (Self::Canonical, [a, b]) => parse_pair(a, b),
            (Self::LegacyHex, [pair]) => {
                let mut chars = pair.chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(x), Some(y), None) => parse_legacy(&x.to_string(), &y.to_string()),
                    _ => Err(NotationError::BadDigit(pair.to_string())),
                }
            }
            (Self::LegacyHex, [x, y]) => parse_legacy(x, y),
            (_, more) => Err(NotationError::TooManyTokens(more.len())),
        }
    }

    /// Render `coord` in this scheme.
    #[must_use]
    pub fn format(self, coord: Coord) -> String {
        match self {
            Self::Canonical => coord.label(),
            Self::LegacyHex => format!("{} {}", legacy_digit(coord.x), legacy_digit(coord.y)),
        }
    }
}

/// Parse a canonical label such as `H8` or `o15`.
pub fn parse_label(text: &str) -> Result<Coord, NotationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotationError::Missing);
    }
    Coord::from_label(text).ok_or_else(|| NotationError::BadLabel(text.to_string()))
}

/// Parse a column letter and a row number given in either order.
pub fn parse_pair(a: &str, b: &str) -> Result<Coord, NotationError> {
    let (a, b) = (a.trim(), b.trim());
    let (column, row) = if starts_with_digit(a) { (b, a) } else { (a, b) };

    let x = single_char(column)
        .and_then(column_index)
        .ok_or_else(|| NotationError::BadColumn(column.to_string()))?;
    let y = row_index(row).ok_or_else(|| NotationError::BadRow(row.to_string()))?;
    Ok(Coord::new(x, y))
}

/// Parse the legacy one-character-per-axis form, x then y.
pub fn parse_legacy(x: &str, y: &str) -> Result<Coord, NotationError> {
    let axis = |s: &str| {
        single_char(s.trim())
            .and_then(|c| c.to_digit(16))
            .filter(|&d| (d as usize) < BOARD_SIZE)
            .map(|d| d as u8)
            .ok_or_else(|| NotationError::BadDigit(s.to_string()))
    };
    Ok(Coord::new(axis(x)?, axis(y)?))
}

fn legacy_digit(v: u8) -> char {
    char::from_digit(u32::from(v), 16).map_or('?', |c| c.to_ascii_uppercase())
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
