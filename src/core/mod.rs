//! Core game types: stones, coordinates, the board and the session RNG.
//!
//! Nothing in this module knows about sessions, networking or search.

pub mod board;
pub mod coord;
pub mod rng;
pub mod stone;

pub use board::{Board, Ray, AXES, WIN_LENGTH};
pub use coord::{Coord, BOARD_SIZE};
pub use rng::GameRng;
pub use stone::Stone;
