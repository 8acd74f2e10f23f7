//! Minimax search with alpha-beta pruning and iterative deepening.
//!
//! The engine always searches as side 0 (the maximizing side). Callers
//! holding side 1 swap the board first; see [`crate::game::Game::best_move`].
//!
//! Each deepening iteration builds a fresh [`Node`] tree from the root board,
//! one cloned board per legal move, and drops it before the next iteration
//! starts. The time limit is a soft deadline: it is only checked when a node
//! decides whether to expand, so an iteration can run past it by the cost of
//! the branch it is finishing.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::board::{Board, Side};
use crate::constants::{
    DEFAULT_START_DEPTH, DEFAULT_TIME_LIMIT_MS, EXTRA_TURN_BONUS, MAX_SEARCH_DEPTH, PITS,
};
use crate::node::Node;

/// Limits for one top-level search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth of the first iteration
    pub start_depth: u32,
    /// Wall-clock budget, checked cooperatively
    pub time_limit: Duration,
    /// No iteration is started at this depth or beyond
    pub max_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_depth: DEFAULT_START_DEPTH,
            time_limit: Duration::from_millis(DEFAULT_TIME_LIMIT_MS),
            max_depth: MAX_SEARCH_DEPTH,
        }
    }
}

/// Outcome of [`search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Chosen pit, 1-based; `None` when side 0 has no legal move
    pub best_pit: Option<usize>,
    /// Utility of the chosen pit
    pub utility: i32,
    /// Depth of the last iteration run
    pub depth: u32,
    pub iterations: u32,
    /// Nodes expanded or evaluated over all iterations
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Side to move for a `minimizing` flag.
fn side_to_move(minimizing: bool) -> Side {
    if minimizing { Side::North } else { Side::South }
}

/// Exact score of a finished game: side 0's store minus side 1's, after the
/// end-game sweep.
pub fn utility(board: &Board) -> i32 {
    let mut swept = board.clone();
    swept.sweep();
    i32::from(swept.store(Side::South)) - i32::from(swept.store(Side::North))
}

/// Heuristic score of an unfinished position.
///
/// Store difference, plus the best capture available to the side to move if
/// that is positive, otherwise a bonus for an available extra turn.
pub fn evaluate(board: &Board, minimizing: bool) -> i32 {
    let side = side_to_move(minimizing);
    let score = i32::from(board.store(Side::South)) - i32::from(board.store(Side::North));

    let steal = board.can_get_opponent_seeds(side);
    if steal > 0 {
        score + steal
    } else {
        score + EXTRA_TURN_BONUS * board.can_get_extra_turn(side)
    }
}

/// Alpha-beta search state for one top-level search.
pub struct Minimax {
    time_limit: Duration,
    start: Instant,
    nodes: u64,
}

impl Minimax {
    /// Start the clock for a search bounded by `time_limit`.
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            start: Instant::now(),
            nodes: 0,
        }
    }

    /// Time since [`Minimax::new`].
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Expand `node` to `depth` plies and return its minimax value.
    ///
    /// `minimizing` is true when side 1 moves at `node`. `elapsed` is the
    /// search time measured by the caller. The value is also stored in
    /// `node.utility`.
    pub fn generate(
        &mut self,
        node: &mut Node,
        depth: u32,
        minimizing: bool,
        elapsed: Duration,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 || elapsed > self.time_limit {
            node.utility = if node.board.status().is_over() {
                utility(&node.board)
            } else {
                evaluate(&node.board, minimizing)
            };
            return node.utility;
        }

        let side = side_to_move(minimizing);
        let mut extra_turn = [false; PITS];
        for (pit, extra) in extra_turn.iter_mut().enumerate() {
            let mut board = node.board.clone();
            let child = match board.move_seeds(pit, side) {
                Ok(result) => {
                    *extra = result.extra_turn;
                    Some(Node::new(&board))
                }
                Err(_) => None,
            };
            node.set_child(pit, child);
        }

        if node.is_leaf() {
            node.utility = utility(&node.board);
            return node.utility;
        }

        for (pit, &extra) in extra_turn.iter().enumerate() {
            let Some(child) = node.child_mut(pit) else {
                continue;
            };
            // The mover keeps the turn when its last seed reached its own store.
            let next = if extra { minimizing } else { !minimizing };
            let elapsed = self.elapsed();
            let value = self.generate(child, depth - 1, next, elapsed, alpha, beta);

            if minimizing {
                beta = beta.min(value);
            } else {
                alpha = alpha.max(value);
            }
            if beta <= alpha {
                break;
            }
        }

        node.utility = if minimizing { beta } else { alpha };
        node.utility
    }
}

/// Pick a move for side 0 of `board` by iterative deepening.
///
/// Every iteration searches a fresh tree one ply deeper than the last, until
/// the time limit has passed or the depth ceiling is reached; at least one
/// iteration always runs. A root child replaces the current choice only with
/// a strictly greater utility, across all iterations.
pub fn search(board: &Board, config: &SearchConfig) -> SearchResult {
    let mut engine = Minimax::new(config.time_limit);
    let mut depth = config.start_depth.max(1);
    let mut best: Option<(usize, i32)> = None;
    let mut iterations = 0;
    let mut last_depth = depth;

    loop {
        let mut root = Node::new(board);
        // The root is always expanded; only its descendants see the clock.
        let value = engine.generate(&mut root, depth, false, Duration::ZERO, i32::MIN, i32::MAX);

        if let Some((pit, child)) = root.best_child() {
            if best.is_none_or(|(_, utility)| child.utility > utility) {
                best = Some((pit, child.utility));
            }
        }
        iterations += 1;
        last_depth = depth;
        debug!(
            "depth {depth}: root value {value}, {} nodes in tree, best so far {:?}, {:?} elapsed",
            root.size(),
            best.map(|(pit, utility)| (pit + 1, utility)),
            engine.elapsed()
        );

        depth += 1;
        if engine.elapsed() >= config.time_limit || depth >= config.max_depth {
            break;
        }
    }

    let result = SearchResult {
        best_pit: best.map(|(pit, _)| pit + 1),
        utility: best.map_or(0, |(_, utility)| utility),
        depth: last_depth,
        iterations,
        nodes: engine.nodes(),
        elapsed: engine.elapsed(),
    };
    info!(
        "search chose pit {:?} (utility {}) after {} iterations, depth {}, {} nodes, {:?}",
        result.best_pit,
        result.utility,
        result.iterations,
        result.depth,
        result.nodes,
        result.elapsed
    );
    result
}
