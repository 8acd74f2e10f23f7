//! Kalaha-Rust: a Kalaha (Kalah) rules engine and minimax player.
//!
//! This crate models a Kalaha board under the sowing and capture rules and
//! picks moves with an alpha-beta minimax search driven by time-boxed
//! iterative deepening.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and search parameters
//! - [`board`] - Board state and rules (sowing, captures, end-game sweep)
//! - [`node`] - Search tree nodes
//! - [`minimax`] - Alpha-beta search and the iterative-deepening driver
//! - [`game`] - Turn tracking, outcomes and whole games between players
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use kalaha_rust::board::{Board, Side};
//! use kalaha_rust::minimax::{SearchConfig, search};
//!
//! // Side 0 opens from the fourth pit
//! let mut board = Board::new();
//! board.move_seeds(3, Side::South).unwrap();
//!
//! // Search the reply as side 1: swap so the engine plays side 0
//! board.swap();
//! let config = SearchConfig {
//!     start_depth: 2,
//!     time_limit: Duration::from_millis(50),
//!     max_depth: 5,
//! };
//! let result = search(&board, &config);
//! println!("Best pit: {:?}", result.best_pit);
//! print!("{board}");
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod minimax;
pub mod node;
