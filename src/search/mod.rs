//! Computer opponent: depth-limited minimax with alpha-beta pruning.
//!
//! ## Pipeline
//!
//! 1. [`candidates::generate`] collects empty cells near existing stones.
//! 2. [`candidates::rank`] orders them by attack plus defence value
//!    from [`pattern::pattern_score`] and the width schedule truncates them.
//! 3. [`SearchEngine`] explores the survivors, scoring leaves with the
//!    static evaluation.
//!
//! ```
//! use rust_gomoku::core::{Board, Coord, Stone};
//! use rust_gomoku::search::{SearchConfig, SearchEngine};
//!
//! let mut board = Board::new();
//! board.apply_move(Coord::CENTER, Stone::Black);
//!
//! let mut engine = SearchEngine::new(SearchConfig::default().with_max_depth(2));
//! let reply = engine.select_move(&board, Stone::White).unwrap();
//! assert!(board.is_vacant(reply));
//! ```

pub mod candidates;
pub mod config;
pub mod engine;
pub mod pattern;
pub mod stats;

pub use candidates::{Candidate, CandidateList};
pub use config::SearchConfig;
pub use engine::{select_move, SearchEngine};
pub use pattern::{pattern_score, LinePattern};
pub use stats::SearchStats;
