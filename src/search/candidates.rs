//! Candidate generation and move ordering.
//!
//! Only cells near existing stones are worth searching. Candidates are
//! collected in discovery order and then stably sorted by heuristic score,
//! so equal scores keep their discovery order.

use smallvec::SmallVec;

use super::pattern::pattern_score;
use crate::core::{Board, Coord, Stone, BOARD_SIZE};

/// An empty cell under consideration, with a transient score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The cell.
    pub coord: Coord,
    /// Ordering key, recomputed at every node.
    pub score: i64,
}

/// Candidate storage. Mid-game positions rarely exceed 64 neighbours.
pub type CandidateList = SmallVec<[Candidate; 64]>;

/// Every empty cell within `radius` (Chebyshev) of a stone.
///
/// Stones are visited in scan order and their neighbourhoods from the
/// lowest offset up; each cell is reported once. An empty board yields the
/// centre alone. A full board yields nothing.
#[must_use]
pub fn generate(board: &Board, radius: u32) -> CandidateList {
    let mut list = CandidateList::new();
    let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];
    let r = radius.min(BOARD_SIZE as u32) as i32;
    let mut any_stone = false;

    for (stone_at, _) in board.stones() {
        any_stone = true;
        for dx in -r..=r {
            for dy in -r..=r {
                let Some(cell) = stone_at.offset(dx, dy, 1) else {
                    continue;
                };
                let mark = &mut seen[cell.x as usize][cell.y as usize];
                if !*mark && board.is_vacant(cell) {
                    *mark = true;
                    list.push(Candidate { coord: cell, score: 0 });
                }
            }
        }
    }

    if !any_stone {
        list.push(Candidate {
            coord: Coord::CENTER,
            score: 0,
        });
    }
    list
}

/// Score each candidate for attack plus defence and sort best first.
pub fn rank(board: &Board, list: &mut CandidateList, mover: Stone) {
    for candidate in list.iter_mut() {
        candidate.score = pattern_score(board, candidate.coord, mover)
            + pattern_score(board, candidate.coord, mover.other());
    }
    // `sort_by` is stable.
    list.sort_by(|a, b| b.score.cmp(&a.score));
}
