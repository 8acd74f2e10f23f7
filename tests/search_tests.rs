//! Search tests: alpha-beta against plain minimax, turn alternation in the
//! tree, and the iterative-deepening driver.
//!
//! Positions come from seeded random games so every run sees the same boards.

use std::time::Duration;

use fastrand::Rng;

use kalaha_rust::board::{Board, Side};
use kalaha_rust::constants::PITS;
use kalaha_rust::game::{Game, Player};
use kalaha_rust::minimax::{Minimax, SearchConfig, evaluate, search, utility};
use kalaha_rust::node::Node;

// =============================================================================
// Helper functions
// =============================================================================

/// A time limit no test search will reach.
const NO_DEADLINE: Duration = Duration::from_secs(3600);

/// Plain minimax over the same tree the engine builds, without pruning.
fn exhaustive(board: &Board, depth: u32, minimizing: bool) -> i32 {
    if depth == 0 {
        return if board.status().is_over() {
            utility(board)
        } else {
            evaluate(board, minimizing)
        };
    }

    let side = if minimizing { Side::North } else { Side::South };
    let values: Vec<i32> = (0..PITS)
        .filter_map(|pit| {
            let mut child = board.clone();
            let result = child.move_seeds(pit, side).ok()?;
            let next = if result.extra_turn { minimizing } else { !minimizing };
            Some(exhaustive(&child, depth - 1, next))
        })
        .collect();

    let best = if minimizing {
        values.iter().min()
    } else {
        values.iter().max()
    };
    best.copied().unwrap_or_else(|| utility(board))
}

/// Positions (with side to move) sampled along seeded random games.
fn sample_positions(seed: u64, games: usize) -> Vec<(Board, Side)> {
    let mut rng = Rng::with_seed(seed);
    let mut positions = Vec::new();
    for _ in 0..games {
        let mut game = Game::new();
        while !game.is_over() {
            if rng.u8(..4) == 0 {
                positions.push((game.board().clone(), game.to_move()));
            }
            let pit = Player::Random.choose(&game, &mut rng).unwrap();
            game.play(pit).unwrap();
        }
    }
    positions
}

fn alpha_beta(board: &Board, depth: u32, minimizing: bool) -> (i32, Node) {
    let mut root = Node::new(board);
    let value = Minimax::new(NO_DEADLINE).generate(
        &mut root,
        depth,
        minimizing,
        Duration::ZERO,
        i32::MIN,
        i32::MAX,
    );
    (value, root)
}

fn single_iteration(depth: u32) -> SearchConfig {
    SearchConfig {
        start_depth: depth,
        time_limit: NO_DEADLINE,
        max_depth: depth + 1,
    }
}

// =============================================================================
// Pruning equivalence
// =============================================================================

#[test]
fn test_pruning_matches_exhaustive_minimax() {
    let positions = sample_positions(17, 6);
    assert!(!positions.is_empty());

    for (board, to_move) in &positions {
        let minimizing = *to_move == Side::North;
        for depth in 0..=4 {
            let (value, root) = alpha_beta(board, depth, minimizing);
            assert_eq!(
                value,
                exhaustive(board, depth, minimizing),
                "depth {depth}, {to_move} to move on\n{board}"
            );
            assert_eq!(root.utility, value);
        }
    }
}

#[test]
fn test_pruning_matches_from_opening() {
    for depth in 1..=4 {
        let (value, _) = alpha_beta(&Board::new(), depth, false);
        assert_eq!(value, exhaustive(&Board::new(), depth, false), "depth {depth}");
    }
}

#[test]
fn test_pruning_never_visits_more_nodes() {
    let board = Board::new();
    let mut engine = Minimax::new(NO_DEADLINE);
    let mut root = Node::new(&board);
    engine.generate(&mut root, 4, false, Duration::ZERO, i32::MIN, i32::MAX);

    // Every node of the full depth-4 tree, counted without pruning.
    fn full_tree(board: &Board, depth: u32, minimizing: bool) -> u64 {
        if depth == 0 {
            return 1;
        }
        let side = if minimizing { Side::North } else { Side::South };
        1 + (0..PITS)
            .filter_map(|pit| {
                let mut child = board.clone();
                let result = child.move_seeds(pit, side).ok()?;
                let next = if result.extra_turn { minimizing } else { !minimizing };
                Some(full_tree(&child, depth - 1, next))
            })
            .sum::<u64>()
    }
    assert!(engine.nodes() <= full_tree(&board, 4, false));
}

// =============================================================================
// Turn alternation
// =============================================================================

#[test]
fn test_extra_turn_keeps_side_to_move_in_tree() {
    // Pits 3 and 5 end in side 0's store; pit 4 does not.
    let board = Board::from_snapshot(&[0, 0, 0, 3, 1, 1, 0, 2, 2, 2, 2, 2, 2, 0]).unwrap();
    let (_, root) = alpha_beta(&board, 2, false);

    let present: Vec<usize> = root.children().map(|(pit, _)| pit).collect();
    assert_eq!(present, [3, 4, 5]);

    for pit in [3, 5] {
        let child = root.child(pit).unwrap();
        let moves: Vec<usize> = child.board.legal_pits(Side::South).collect();
        assert_eq!(
            child.children().map(|(p, _)| p).collect::<Vec<_>>(),
            moves,
            "side 0 should move again after pit {pit}"
        );
        for (p, grandchild) in child.children() {
            let mut expected = child.board.clone();
            expected.move_seeds(p, Side::South).unwrap();
            assert_eq!(grandchild.board, expected);
        }
    }

    // After pit 4 the turn passes: side 1 has six playable pits.
    assert_eq!(root.child(4).unwrap().children().count(), 6);
}

#[test]
fn test_extra_turn_for_minimizing_side() {
    // Side 1's last pit reaches its store; it then plays again.
    let board = Board::from_snapshot(&[2, 2, 2, 2, 2, 2, 0, 0, 0, 0, 0, 3, 1, 0]).unwrap();
    let (_, root) = alpha_beta(&board, 2, true);

    let extra = root.child(5).unwrap();
    assert_eq!(extra.board.store(Side::North), 1);
    assert_eq!(extra.children().map(|(p, _)| p).collect::<Vec<_>>(), [4]);

    let plain = root.child(4).unwrap();
    assert_eq!(plain.children().count(), 6);
}

// =============================================================================
// Iterative deepening driver
// =============================================================================

#[test]
fn test_search_picks_first_best_child() {
    for (board, to_move) in sample_positions(29, 4) {
        if to_move != Side::South {
            continue;
        }
        let depth = 3;
        let result = search(&board, &single_iteration(depth));

        let values: Vec<(usize, i32)> = (0..PITS)
            .filter_map(|pit| {
                let mut child = board.clone();
                let moved = child.move_seeds(pit, Side::South).ok()?;
                Some((pit, exhaustive(&child, depth - 1, !moved.extra_turn)))
            })
            .collect();
        let best = values.iter().map(|&(_, v)| v).max().unwrap();
        let first_best = values.iter().find(|&&(_, v)| v == best).unwrap().0;

        assert_eq!(result.best_pit, Some(first_best + 1), "on\n{board}");
        assert_eq!(result.utility, best);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.depth, depth);
    }
}

#[test]
fn test_search_deepens_until_depth_ceiling() {
    let config = SearchConfig {
        start_depth: 1,
        time_limit: NO_DEADLINE,
        max_depth: 5,
    };
    let result = search(&Board::new(), &config);
    assert_eq!(result.iterations, 4);
    assert_eq!(result.depth, 4);
    assert!(result.best_pit.is_some());
    assert!(result.nodes > 0);
}

#[test]
fn test_search_runs_once_without_time() {
    let config = SearchConfig {
        start_depth: 3,
        time_limit: Duration::ZERO,
        max_depth: 20,
    };
    let result = search(&Board::new(), &config);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.depth, 3);
    let pit = result.best_pit.expect("an open board always yields a move");
    assert!(Board::new().legal_pits(Side::South).any(|p| p + 1 == pit));
}

#[test]
fn test_engine_moves_with_zero_time_limit() {
    let config = SearchConfig {
        start_depth: 2,
        time_limit: Duration::ZERO,
        max_depth: 20,
    };
    for (mut board, side) in sample_positions(11, 4) {
        if side == Side::North {
            board.swap();
        }
        let pit = search(&board, &config).best_pit.expect("active board without a move");
        assert!(board.legal_pits(Side::South).any(|p| p + 1 == pit));
    }
}

#[test]
fn test_search_stops_near_time_limit() {
    let config = SearchConfig {
        start_depth: 4,
        time_limit: Duration::from_millis(100),
        max_depth: 37,
    };
    let result = search(&Board::new(), &config);
    assert!(result.best_pit.is_some());
    assert!(result.depth < 37);
    // The deadline is soft, but one overrun branch is far below this.
    assert!(result.elapsed < Duration::from_secs(10));
}

#[test]
fn test_search_returns_legal_pit() {
    for (board, to_move) in sample_positions(41, 3) {
        let game = Game::from_board(board, to_move);
        let result = game.best_move(&single_iteration(2));
        let pit = result.best_pit.expect("active position has a move") - 1;
        assert!(game.board().legal_pits(to_move).any(|p| p == pit));
    }
}
