//! Line-pattern scoring.
//!
//! Scores what a hypothetical stone would create on each of the four axes
//! through a cell. The same function ranks candidates and feeds the static
//! evaluation.

use crate::core::{Board, Coord, Stone, AXES};

/// Five or more in a row.
pub const SCORE_FIVE: i64 = 1_000_000;
/// Four with both ends open.
pub const SCORE_OPEN_FOUR: i64 = 50_000;
/// Four with at most one end open.
pub const SCORE_DEAD_FOUR: i64 = 10_000;
/// Three with both ends open.
pub const SCORE_OPEN_THREE: i64 = 4_000;
/// Three with one end open.
pub const SCORE_DEAD_THREE: i64 = 500;
/// Two with both ends open.
pub const SCORE_OPEN_TWO: i64 = 200;
/// Two with one end open.
pub const SCORE_DEAD_TWO: i64 = 50;
/// Lone stone with both ends open.
pub const SCORE_OPEN_ONE: i64 = 25;

/// Classification of one axis through a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinePattern {
    /// Points for this axis.
    pub score: i64,
    /// Exactly three with both ends open.
    pub open_three: bool,
    /// Exactly four with both ends open.
    pub open_four: bool,
}

impl LinePattern {
    /// Classify a run of `length` stones with the given end states.
    #[must_use]
    pub fn classify(length: usize, head_open: bool, tail_open: bool) -> Self {
        let both = head_open && tail_open;
        let either = head_open || tail_open;
        let score = |s: i64| Self { score: s, ..Self::default() };

        match length {
            n if n >= 5 => score(SCORE_FIVE),
            4 if both => Self {
                score: SCORE_OPEN_FOUR,
                open_four: true,
                ..Self::default()
            },
            4 => score(SCORE_DEAD_FOUR),
            3 if both => Self {
                score: SCORE_OPEN_THREE,
                open_three: true,
                ..Self::default()
            },
            3 if either => score(SCORE_DEAD_THREE),
            2 if both => score(SCORE_OPEN_TWO),
            2 if either => score(SCORE_DEAD_TWO),
            1 if both => score(SCORE_OPEN_ONE),
            _ => Self::default(),
        }
    }
}

/// Analyse one axis as if `stone` sat on `coord`.
#[must_use]
pub fn analyse_line(board: &Board, coord: Coord, stone: Stone, axis: (i32, i32)) -> LinePattern {
    let (dx, dy) = axis;
    let head = board.ray(coord, stone, -dx, -dy);
    let tail = board.ray(coord, stone, dx, dy);
    LinePattern::classify(head.count + 1 + tail.count, head.open, tail.open)
}

/// Total pattern value of placing `stone` on `coord`.
///
/// Zero for off-board or occupied cells. Two or more open threes earn a
/// double-three bonus; any open four earns an urgency bonus.
#[must_use]
pub fn pattern_score(board: &Board, coord: Coord, stone: Stone) -> i64 {
    if !board.is_vacant(coord) {
        return 0;
    }

    let mut total = 0;
    let mut open_threes = 0;
    let mut open_four = false;

    for axis in AXES {
        let line = analyse_line(board, coord, stone, axis);
        total += line.score;
        open_threes += usize::from(line.open_three);
        open_four |= line.open_four;
    }

    if open_threes >= 2 {
        total += SCORE_OPEN_THREE * 2;
    }
    if open_four {
        total += SCORE_OPEN_FOUR / 2;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(stones: &[((u8, u8), Stone)]) -> Board {
        let mut board = Board::new();
        for &((x, y), stone) in stones {
            assert!(board.apply_move(Coord::new(x, y), stone));
        }
        board
    }

    #[test]
    fn test_classify_table() {
        assert_eq!(LinePattern::classify(6, false, false).score, SCORE_FIVE);
        assert_eq!(LinePattern::classify(5, false, false).score, SCORE_FIVE);
        assert!(LinePattern::classify(4, true, true).open_four);
        assert_eq!(LinePattern::classify(4, true, false).score, SCORE_DEAD_FOUR);
        assert_eq!(LinePattern::classify(4, false, false).score, SCORE_DEAD_FOUR);
        assert!(LinePattern::classify(3, true, true).open_three);
        assert_eq!(LinePattern::classify(3, false, true).score, SCORE_DEAD_THREE);
        assert_eq!(LinePattern::classify(3, false, false).score, 0);
        assert_eq!(LinePattern::classify(2, true, true).score, SCORE_OPEN_TWO);
        assert_eq!(LinePattern::classify(2, true, false).score, SCORE_DEAD_TWO);
        assert_eq!(LinePattern::classify(1, true, true).score, SCORE_OPEN_ONE);
        assert_eq!(LinePattern::classify(1, true, false).score, 0);
    }

    #[test]
    fn test_lone_cell_in_open_space() {
        let board = Board::new();
        // Four open single-stone axes.
        assert_eq!(pattern_score(&board, Coord::new(7, 7), Stone::Black), 4 * SCORE_OPEN_ONE);
    }

    #[test]
    fn test_corner_cell_is_half_closed() {
        let board = Board::new();
        // Every axis has the edge on one side.
        assert_eq!(pattern_score(&board, Coord::new(0, 0), Stone::Black), 0);
    }

    #[test]
    fn test_occupied_cell_scores_zero() {
        let board = board_with(&[((7, 7), Stone::White)]);
        assert_eq!(pattern_score(&board, Coord::new(7, 7), Stone::White), 0);
        assert_eq!(pattern_score(&board, Coord::new(20, 7), Stone::White), 0);
    }

    #[test]
    fn test_completing_five() {
        let board = board_with(&[
            ((7, 4), Stone::Black),
            ((7, 5), Stone::Black),
            ((7, 6), Stone::Black),
            ((7, 7), Stone::Black),
        ]);
        let score = pattern_score(&board, Coord::new(7, 8), Stone::Black);
        assert!(score >= SCORE_FIVE);
        // The same cell is worth little to white.
        assert!(pattern_score(&board, Coord::new(7, 8), Stone::White) < SCORE_DEAD_THREE);
    }

    #[test]
    fn test_open_four_bonus() {
        let board = board_with(&[((5, 7), Stone::Black), ((6, 7), Stone::Black), ((7, 7), Stone::Black)]);
        let line = analyse_line(&board, Coord::new(8, 7), Stone::Black, (1, 0));
        assert!(line.open_four);

        let score = pattern_score(&board, Coord::new(8, 7), Stone::Black);
        let others = 3 * SCORE_OPEN_ONE;
        assert_eq!(score, SCORE_OPEN_FOUR + SCORE_OPEN_FOUR / 2 + others);
    }

    #[test]
    fn test_double_three_bonus() {
        // Two open twos crossing at (7,7).
        let board = board_with(&[
            ((5, 7), Stone::White),
            ((6, 7), Stone::White),
            ((7, 5), Stone::White),
            ((7, 6), Stone::White),
        ]);
        let score = pattern_score(&board, Coord::new(7, 7), Stone::White);
        let expected = 2 * SCORE_OPEN_THREE + 2 * SCORE_OPEN_ONE + 2 * SCORE_OPEN_THREE;
        assert_eq!(score, expected);
    }

    #[test]
    fn test_blocked_three() {
        let board = board_with(&[
            ((4, 7), Stone::White),
            ((5, 7), Stone::Black),
            ((6, 7), Stone::Black),
        ]);
        let line = analyse_line(&board, Coord::new(7, 7), Stone::Black, (1, 0));
        assert_eq!(line.score, SCORE_DEAD_THREE);
        assert!(!line.open_three);
    }
}
