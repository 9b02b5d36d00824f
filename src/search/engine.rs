//! Minimax search with alpha-beta pruning.
//!
//! The engine never touches the caller's board: it searches a private copy
//! and every trial placement is a [`Trial`] guard that retracts its stone
//! when dropped, on every exit path of a branch.

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use tracing::{debug, instrument};

use super::candidates::{self, CandidateList};
use super::config::SearchConfig;
use super::pattern::{pattern_score, SCORE_FIVE};
use super::stats::SearchStats;
use crate::core::{Board, Coord, Stone};

/// Move selection for the computer opponent.
///
/// Owns its configuration and the statistics of the most recent call.
/// Holds no state between calls, so one engine per thread is all the
/// coordination concurrent searches need.
#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    config: SearchConfig,
    stats: SearchStats,
}

impl SearchEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
        }
    }

    /// Choose a move for `stone` on `board`.
    ///
    /// Returns `None` only when the board has no empty cell. The result is
    /// a pure function of the board and colour.
    #[instrument(level = "debug", skip_all, fields(stone = %stone))]
    pub fn select_move(&mut self, board: &Board, stone: Stone) -> Option<Coord> {
        let start = Instant::now();
        self.stats.reset();

        let mut work = board.clone();
        let chosen = Minimax {
            config: &self.config,
            stats: &mut self.stats,
            me: stone,
        }
        .root(&mut work);

        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            chosen = ?chosen.map(|c| c.label()),
            nodes = self.stats.nodes,
            leaves = self.stats.leaf_evaluations,
            cutoffs = self.stats.cutoffs,
            time_us = self.stats.time_us,
            nodes_per_sec = self.stats.nodes_per_second(),
            "search complete"
        );
        chosen
    }

    /// Get search statistics of the last call.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

/// Choose a move with the default configuration.
///
/// ```
/// use rust_gomoku::core::{Board, Coord, Stone};
/// use rust_gomoku::search::select_move;
///
/// assert_eq!(select_move(&Board::new(), Stone::White), Some(Coord::CENTER));
/// ```
#[must_use]
pub fn select_move(board: &Board, stone: Stone) -> Option<Coord> {
    SearchEngine::default().select_move(board, stone)
}

/// A stone placed for the duration of one branch.
struct Trial<'b> {
    board: &'b mut Board,
    at: Coord,
}

impl<'b> Trial<'b> {
    fn place(board: &'b mut Board, at: Coord, stone: Stone) -> Self {
        board.set_cell(at, Some(stone));
        Self { board, at }
    }
}

impl Deref for Trial<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.board.set_cell(self.at, None);
    }
}

fn completes_five(board: &mut Board, at: Coord, stone: Stone) -> bool {
    Trial::place(board, at, stone).check_win(at)
}

/// Per-call search context.
struct Minimax<'a> {
    config: &'a SearchConfig,
    stats: &'a mut SearchStats,
    /// The searching colour; maximizing nodes move for it.
    me: Stone,
}

impl Minimax<'_> {
    fn root(&mut self, board: &mut Board) -> Option<Coord> {
        let depth = self.config.max_depth;
        let Some(candidates) = self.ordered_candidates(board, self.me, depth) else {
            return board.first_vacant();
        };
        self.stats.root_candidates = candidates.len();

        let mut best = None;
        let mut best_value = i64::MIN;
        let mut alpha = i64::MIN;
        let beta = i64::MAX;

        for candidate in &candidates {
            if !board.is_vacant(candidate.coord) {
                continue;
            }
            if completes_five(board, candidate.coord, self.me) {
                return Some(candidate.coord);
            }
            let value = self.trial(board, candidate.coord, self.me, depth, alpha, beta);
            if value > best_value {
                best_value = value;
                best = Some(candidate.coord);
            }
            alpha = alpha.max(best_value);
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best.or_else(|| board.first_vacant())
    }

    /// Value of the node reached after `mover` plays `at`, searched with
    /// `depth_left` plies counted from the parent.
    fn trial(
        &mut self,
        board: &mut Board,
        at: Coord,
        mover: Stone,
        depth_left: u32,
        alpha: i64,
        beta: i64,
    ) -> i64 {
        let mut placed = Trial::place(board, at, mover);
        if placed.check_win(at) {
            return if mover == self.me { SCORE_FIVE } else { -SCORE_FIVE };
        }
        let maximizing = mover != self.me;
        self.minimax(&mut placed, depth_left.saturating_sub(1), alpha, beta, maximizing)
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth_left: u32,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
    ) -> i64 {
        self.stats.nodes += 1;
        let ply = self.config.max_depth.saturating_sub(depth_left);
        self.stats.max_ply = self.stats.max_ply.max(ply);

        if depth_left == 0 {
            return self.evaluate(board);
        }

        let mover = if maximizing { self.me } else { self.me.other() };
        let Some(candidates) = self.ordered_candidates(board, mover, depth_left) else {
            return self.evaluate(board);
        };

        let mut value = if maximizing { i64::MIN } else { i64::MAX };
        for candidate in &candidates {
            if !board.is_vacant(candidate.coord) {
                continue;
            }
            let child = self.trial(board, candidate.coord, mover, depth_left, alpha, beta);
            if maximizing {
                value = value.max(child);
                alpha = alpha.max(value);
            } else {
                value = value.min(child);
                beta = beta.min(value);
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }
        value
    }

    /// Ranked and width-capped candidates, `None` when there are none.
    fn ordered_candidates(&self, board: &Board, mover: Stone, depth_left: u32) -> Option<CandidateList> {
        let mut list = candidates::generate(board, self.config.radius);
        if list.is_empty() {
            return None;
        }
        candidates::rank(board, &mut list, mover);
        list.truncate(self.config.width_for(depth_left));
        Some(list)
    }

    /// Static value from the searching colour's point of view.
    fn evaluate(&mut self, board: &Board) -> i64 {
        self.stats.leaf_evaluations += 1;

        for (coord, stone) in board.stones() {
            if board.check_win(coord) {
                return if stone == self.me { SCORE_FIVE } else { -SCORE_FIVE };
            }
        }

        let other = self.me.other();
        Coord::all()
            .filter(|&c| board.is_vacant(c))
            .map(|c| pattern_score(board, c, self.me) - pattern_score(board, c, other))
            .sum()
    }
}
