//! The playing surface.
//!
//! A fixed `BOARD_SIZE`×`BOARD_SIZE` grid of cells, each empty or holding
//! one stone. The only public mutators are [`Board::apply_move`] and
//! [`Board::reset`]; once a cell is filled it keeps its colour until the
//! next reset.
//!
//! ```
//! use rust_gomoku::core::{Board, Coord, Stone};
//!
//! let mut board = Board::new();
//! assert!(board.apply_move(Coord::new(7, 7), Stone::Black));
//! assert!(!board.apply_move(Coord::new(7, 7), Stone::White));
//! assert_eq!(board.get(Coord::new(7, 7)), Some(Stone::Black));
//! ```

use serde::{Deserialize, Serialize};

use super::coord::{Coord, BOARD_SIZE};
use super::stone::Stone;

/// The four line directions: vertical, horizontal and both diagonals.
pub const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Contiguous stones seen walking away from a cell in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ray {
    /// Same-colour stones passed, not counting the origin.
    pub count: usize,
    /// Whether the first cell after the run is on the board and empty.
    pub open: bool,
}

/// Grid state plus the last placement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Indexed `[x][y]`.
    cells: [[Option<Stone>; BOARD_SIZE]; BOARD_SIZE],
    last_move: Option<Coord>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            last_move: None,
        }
    }

    /// Clear every cell and the last-move marker.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Stone at `coord`; `None` when empty or off the board.
    #[inline]
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Stone> {
        if coord.in_bounds() {
            self.cells[coord.x as usize][coord.y as usize]
        } else {
            None
        }
    }

    /// Whether `coord` is on the board and empty.
    #[inline]
    #[must_use]
    pub fn is_vacant(&self, coord: Coord) -> bool {
        coord.in_bounds() && self.cells[coord.x as usize][coord.y as usize].is_none()
    }

    /// Place `stone` at `coord`.
    ///
    /// Returns `false` without touching the board when `coord` is off the
    /// board or already occupied.
    pub fn apply_move(&mut self, coord: Coord, stone: Stone) -> bool {
        if !self.is_vacant(coord) {
            return false;
        }
        self.cells[coord.x as usize][coord.y as usize] = Some(stone);
        self.last_move = Some(coord);
        true
    }

    /// Whether the stone at `coord` is part of five or more in a row.
    ///
    /// Always `false` for an empty cell.
    #[must_use]
    pub fn check_win(&self, coord: Coord) -> bool {
        match self.get(coord) {
            Some(stone) => AXES
                .iter()
                .any(|&axis| self.line_length(coord, stone, axis) >= WIN_LENGTH),
            None => false,
        }
    }

    /// Length of the `stone` line through `coord` along `axis`, counting
    /// `coord` itself whatever it currently holds.
    #[must_use]
    pub fn line_length(&self, coord: Coord, stone: Stone, axis: (i32, i32)) -> usize {
        let (dx, dy) = axis;
        1 + self.ray(coord, stone, dx, dy).count + self.ray(coord, stone, -dx, -dy).count
    }

    /// Walk from `coord` (exclusive) along `(dx, dy)` over `stone` cells.
    #[must_use]
    pub fn ray(&self, coord: Coord, stone: Stone, dx: i32, dy: i32) -> Ray {
        let mut count = 0;
        let mut k = 1;
        loop {
            match coord.offset(dx, dy, k) {
                Some(next) if self.get(next) == Some(stone) => {
                    count += 1;
                    k += 1;
                }
                Some(next) => {
                    return Ray {
                        count,
                        open: self.is_vacant(next),
                    }
                }
                None => return Ray { count, open: false },
            }
        }
    }

    /// Most recent successful placement.
    #[must_use]
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// Occupied cells in scan order.
    pub fn stones(&self) -> impl Iterator<Item = (Coord, Stone)> + '_ {
        Coord::all().filter_map(move |c| self.get(c).map(|s| (c, s)))
    }

    /// Whether any stone has been placed.
    #[must_use]
    pub fn has_stones(&self) -> bool {
        self.stones().next().is_some()
    }

    /// First empty cell in scan order (`x` outer, `y` inner).
    #[must_use]
    pub fn first_vacant(&self) -> Option<Coord> {
        Coord::all().find(|&c| self.is_vacant(c))
    }

    /// Whether no empty cell remains.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.first_vacant().is_none()
    }

    /// Raw cell write used by search trials; bypasses the occupancy rule and
    /// leaves the last-move marker alone.
    #[inline]
    pub(crate) fn set_cell(&mut self, coord: Coord, cell: Option<Stone>) {
        self.cells[coord.x as usize][coord.y as usize] = cell;
    }
}
