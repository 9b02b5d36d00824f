//! Search engine integration tests.

use rust_gomoku::core::{Board, Coord, Stone};
use rust_gomoku::search::{select_move, SearchConfig, SearchEngine};

fn board_with(stones: &[((u8, u8), Stone)]) -> Board {
    let mut board = Board::new();
    for &((x, y), stone) in stones {
        assert!(board.apply_move(Coord::new(x, y), stone), "({x}, {y}) already taken");
    }
    board
}

// =============================================================================
// Opening and Threat Tests
// =============================================================================

#[test]
fn test_empty_board_returns_center() {
    assert_eq!(select_move(&Board::new(), Stone::White), Some(Coord::new(7, 7)));
    assert_eq!(select_move(&Board::new(), Stone::Black), Some(Coord::new(7, 7)));
}

#[test]
fn test_blocks_open_four() {
    let board = board_with(&[
        ((7, 4), Stone::Black),
        ((7, 5), Stone::Black),
        ((7, 6), Stone::Black),
        ((7, 7), Stone::Black),
    ]);

    let mut engine = SearchEngine::default();
    let chosen = engine.select_move(&board, Stone::White);

    assert!(
        chosen == Some(Coord::new(7, 3)) || chosen == Some(Coord::new(7, 8)),
        "expected a block at an end of the four, got {chosen:?}"
    );
    assert!(engine.stats().cutoffs > 0);
}

#[test]
fn test_prefers_own_win_over_block() {
    // Both sides have four; white to move wins rather than blocks.
    let board = board_with(&[
        ((2, 2), Stone::White),
        ((3, 2), Stone::White),
        ((4, 2), Stone::White),
        ((5, 2), Stone::White),
        ((7, 6), Stone::Black),
        ((7, 7), Stone::Black),
        ((7, 8), Stone::Black),
        ((7, 9), Stone::Black),
    ]);
    let chosen = select_move(&board, Stone::White).unwrap();
    assert!(chosen == Coord::new(1, 2) || chosen == Coord::new(6, 2), "got {chosen}");
}

#[test]
fn test_extends_open_three_to_four() {
    // White has an open three in a quiet position and nothing to fear.
    let board = board_with(&[
        ((5, 7), Stone::White),
        ((6, 7), Stone::White),
        ((7, 7), Stone::White),
        ((12, 12), Stone::Black),
        ((0, 14), Stone::Black),
    ]);
    let mut engine = SearchEngine::new(SearchConfig::default().with_max_depth(2));
    let chosen = engine.select_move(&board, Stone::White).unwrap();
    assert!(
        chosen == Coord::new(4, 7) || chosen == Coord::new(8, 7),
        "expected an open four, got {chosen}"
    );
}

// =============================================================================
// Contract Tests
// =============================================================================

#[test]
fn test_result_is_vacant_and_input_unchanged() {
    let board = board_with(&[
        ((7, 7), Stone::Black),
        ((7, 8), Stone::White),
        ((8, 8), Stone::Black),
        ((6, 6), Stone::White),
        ((9, 9), Stone::Black),
    ]);
    let before = board.clone();

    let mut engine = SearchEngine::new(SearchConfig::default().with_max_depth(2));
    for stone in Stone::ALL {
        let chosen = engine.select_move(&board, stone).unwrap();
        assert!(chosen.in_bounds());
        assert!(board.is_vacant(chosen));
    }
    assert_eq!(board, before);
}

#[test]
fn test_same_input_same_output() {
    let board = board_with(&[((7, 7), Stone::Black), ((8, 7), Stone::White), ((8, 8), Stone::Black)]);
    let config = SearchConfig::default().with_max_depth(2);
    let first = SearchEngine::new(config.clone()).select_move(&board, Stone::White);
    for _ in 0..3 {
        assert_eq!(SearchEngine::new(config.clone()).select_move(&board, Stone::White), first);
    }
}

#[test]
fn test_narrow_widths_still_legal() {
    let board = board_with(&[((0, 0), Stone::Black), ((14, 14), Stone::White)]);
    let mut engine = SearchEngine::new(
        SearchConfig::default()
            .with_max_depth(3)
            .with_radius(1)
            .with_branch_widths(vec![2, 1]),
    );
    let chosen = engine.select_move(&board, Stone::Black).unwrap();
    assert!(board.is_vacant(chosen));
    assert_eq!(engine.stats().root_candidates, 2);
}

#[test]
fn test_stats_reset_between_calls() {
    let mut engine = SearchEngine::new(SearchConfig::default().with_max_depth(2));
    let board = board_with(&[((7, 7), Stone::Black)]);
    engine.select_move(&board, Stone::White);
    let busy = engine.stats().nodes;
    assert!(busy > 0);

    engine.select_move(&Board::new(), Stone::White);
    assert!(engine.stats().nodes < busy);
}

#[test]
fn test_engines_on_threads() {
    let board = board_with(&[((7, 7), Stone::Black), ((8, 8), Stone::White)]);
    let expected = SearchEngine::new(SearchConfig::default().with_max_depth(2)).select_move(&board, Stone::Black);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let board = board.clone();
            std::thread::spawn(move || {
                SearchEngine::new(SearchConfig::default().with_max_depth(2)).select_move(&board, Stone::Black)
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
