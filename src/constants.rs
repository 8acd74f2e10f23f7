//! Board geometry and search parameters.
//!
//! The board is a flat array of seed counts: side 0's pits, side 0's store,
//! side 1's pits, side 1's store.
//!
//! # Start Seed Configuration
//!
//! The number of seeds each pit starts with is controlled by Cargo features:
//! - `seeds6` (default): Kalah(6,6), 72 seeds in play
//! - `seeds4`: Kalah(6,4), 48 seeds in play
//!
//! ```sh
//! cargo build                                            # 6 seeds per pit
//! cargo build --no-default-features --features seeds4    # 4 seeds per pit
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Pits per side, excluding the store.
pub const PITS: usize = 6;

/// Seeds placed in every pit at the start of a game.
#[cfg(feature = "seeds6")]
pub const SEEDS_PER_PIT: u8 = 6;

#[cfg(feature = "seeds4")]
pub const SEEDS_PER_PIT: u8 = 4;

#[cfg(all(feature = "seeds6", feature = "seeds4"))]
compile_error!("Cannot enable both 'seeds6' and 'seeds4' features at the same time");

#[cfg(not(any(feature = "seeds6", feature = "seeds4")))]
compile_error!("Must enable exactly one start seed feature: 'seeds6' or 'seeds4'");

/// Pit index of the store within a side (`count(STORE, side)` reads the store).
pub const STORE: usize = PITS;

/// Positions per side, store included.
pub const SIDE_LEN: usize = PITS + 1;

/// Total number of positions on the board.
pub const BOARD_LEN: usize = 2 * SIDE_LEN;

/// Seeds in play for a game started from the default position.
pub const TOTAL_SEEDS: u32 = 2 * PITS as u32 * SEEDS_PER_PIT as u32;

// =============================================================================
// Search Parameters
// =============================================================================

/// Heuristic bonus per available extra turn for the side to move.
pub const EXTRA_TURN_BONUS: i32 = 6;

/// Depth of the first iterative-deepening iteration.
pub const DEFAULT_START_DEPTH: u32 = 8;

/// Wall-clock budget for one move, in milliseconds.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 3000;

/// Iterative deepening never starts an iteration at or beyond this depth.
pub const MAX_SEARCH_DEPTH: u32 = 37;

// =============================================================================
// Match Parameters
// =============================================================================

/// Games played by the `match` command unless told otherwise.
pub const DEFAULT_GAMES: usize = 2;
