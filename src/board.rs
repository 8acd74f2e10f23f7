//! Kalaha board state and sowing rules.
//!
//! The board is a fixed array of [`BOARD_LEN`] seed counts laid out as
//! side 0's pits, side 0's store, side 1's pits, side 1's store. Sides are
//! addressed through [`Side`]; raw side indices convert with `Side::try_from`,
//! which applies the same bounds check as the pit accessors.
//!
//! Sowing walks the board in index order and never drops a seed into the
//! opponent's store. All rule lookahead (extra turns, captures) goes through
//! the same walk, so the heuristics can never disagree with a real move.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{BOARD_LEN, PITS, SEEDS_PER_PIT, SIDE_LEN, STORE};

/// One of the two players' halves of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Side 0, drawn on the bottom row.
    South,
    /// Side 1, drawn on the top row.
    North,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::South, Side::North];

    pub fn index(self) -> usize {
        match self {
            Side::South => 0,
            Side::North => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::North => Side::South,
        }
    }

    /// `+1` for side 0 and `-1` for side 1: utilities are measured from side 0.
    pub fn sign(self) -> i32 {
        match self {
            Side::South => 1,
            Side::North => -1,
        }
    }

    fn offset(self) -> usize {
        self.index() * SIDE_LEN
    }

    fn store_index(self) -> usize {
        self.offset() + STORE
    }

    fn owns_pit(self, idx: usize) -> bool {
        (self.offset()..self.offset() + PITS).contains(&idx)
    }
}

impl TryFrom<usize> for Side {
    type Error = BoardError;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        match side {
            0 => Ok(Side::South),
            1 => Ok(Side::North),
            _ => Err(BoardError::OutOfRange {
                kind: "side",
                index: side,
                max: 1,
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::South => write!(f, "south"),
            Side::North => write!(f, "north"),
        }
    }
}

/// Errors raised by board accessors, moves and snapshot parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A pit or side index outside the board.
    #[error("{kind} index {index} is out of range (max {max})")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        max: usize,
    },
    /// Sowing was attempted from a pit holding no seeds.
    #[error("pit {pit} on the {side} side is empty")]
    EmptyPitMove { pit: usize, side: Side },
    #[error("snapshot has {found} counts, expected {expected}")]
    SnapshotLength { found: usize, expected: usize },
    #[error("invalid seed count {0:?}")]
    InvalidCount(String),
    #[error("snapshot holds {0} seeds, more than a store can hold")]
    SeedOverflow(u32),
}

/// Whether the game can continue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Both sides still have seeds in their pits.
    Active,
    /// This side's pits are all empty. Side 0 is checked first.
    Exhausted(Side),
}

impl Status {
    pub fn is_over(self) -> bool {
        matches!(self, Status::Exhausted(_))
    }
}

/// What a successful [`Board::move_seeds`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    /// Board index that received the last seed.
    pub last: usize,
    /// Seeds moved into the mover's store by a capture, 0 if none.
    pub captured: u8,
    /// The last seed landed in the mover's own store.
    pub extra_turn: bool,
    /// Status after the move, end-game sweep included.
    pub status: Status,
}

/// Seed counts for both sides of a Kalaha board.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [u8; BOARD_LEN],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Index after `idx` in sowing order for `side`, stepping over the opponent's store.
fn next_position(idx: usize, side: Side) -> usize {
    let next = (idx + 1) % BOARD_LEN;
    if next == side.opponent().store_index() {
        (next + 1) % BOARD_LEN
    } else {
        next
    }
}

/// Index receiving the last of `seeds` sown from `start` by `side`.
fn landing(start: usize, side: Side, seeds: u8) -> usize {
    (0..seeds).fold(start, |idx, _| next_position(idx, side))
}

/// Index of the pit directly across the board from pit index `idx`.
fn mirror(idx: usize) -> usize {
    2 * PITS - idx
}

impl Board {
    /// A fresh board: every pit holds [`SEEDS_PER_PIT`], both stores are empty.
    pub fn new() -> Self {
        let mut cells = [SEEDS_PER_PIT; BOARD_LEN];
        for side in Side::ALL {
            cells[side.store_index()] = 0;
        }
        Self { cells }
    }

    /// Build a board from raw counts in board layout order.
    pub fn from_snapshot(counts: &[u8]) -> Result<Self, BoardError> {
        let cells: [u8; BOARD_LEN] = counts.try_into().map_err(|_| BoardError::SnapshotLength {
            found: counts.len(),
            expected: BOARD_LEN,
        })?;

        // Every seed may end up in one store.
        let total: u32 = cells.iter().map(|&c| u32::from(c)).sum();
        if total > u32::from(u8::MAX) {
            return Err(BoardError::SeedOverflow(total));
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[u8; BOARD_LEN] {
        &self.cells
    }

    pub fn total_seeds(&self) -> u32 {
        self.cells.iter().map(|&c| u32::from(c)).sum()
    }

    /// Seeds in `pit` of `side`. Pit [`STORE`] is the side's store.
    pub fn count(&self, pit: usize, side: Side) -> Result<u8, BoardError> {
        if pit > STORE {
            return Err(BoardError::OutOfRange {
                kind: "pit",
                index: pit,
                max: STORE,
            });
        }
        Ok(self.cells[side.offset() + pit])
    }

    pub fn store(&self, side: Side) -> u8 {
        self.cells[side.store_index()]
    }

    /// The side's playable pits, store excluded.
    pub fn pits(&self, side: Side) -> &[u8] {
        &self.cells[side.offset()..side.offset() + PITS]
    }

    /// Pits `side` may sow from.
    pub fn legal_pits(&self, side: Side) -> impl Iterator<Item = usize> + '_ {
        self.pits(side)
            .iter()
            .enumerate()
            .filter(|&(_, &seeds)| seeds > 0)
            .map(|(pit, _)| pit)
    }

    /// Exchange the two sides, pits and stores alike.
    pub fn swap(&mut self) {
        let (south, north) = self.cells.split_at_mut(SIDE_LEN);
        south.swap_with_slice(north);
    }

    pub fn status(&self) -> Status {
        Side::ALL
            .into_iter()
            .find(|&side| self.pits(side).iter().all(|&seeds| seeds == 0))
            .map_or(Status::Active, Status::Exhausted)
    }

    /// Once a side is exhausted, move the other side's pits into its own store.
    pub fn sweep(&mut self) -> Status {
        let status = self.status();
        if let Status::Exhausted(side) = status {
            let rest = side.opponent();
            let pits = rest.offset()..rest.offset() + PITS;
            let swept: u8 = self.cells[pits.clone()].iter().sum();
            self.cells[pits].fill(0);
            self.cells[rest.store_index()] += swept;
        }
        status
    }

    /// Sow `pit` of `side` and apply a landing capture. No end-game sweep.
    ///
    /// Returns the index of the last seed and the seeds captured.
    fn sow(&mut self, pit: usize, side: Side) -> Result<(usize, u8), BoardError> {
        if pit >= PITS {
            return Err(BoardError::OutOfRange {
                kind: "pit",
                index: pit,
                max: PITS - 1,
            });
        }
        let start = side.offset() + pit;
        let seeds = self.cells[start];
        if seeds == 0 {
            return Err(BoardError::EmptyPitMove { pit, side });
        }

        self.cells[start] = 0;
        let mut last = start;
        for _ in 0..seeds {
            last = next_position(last, side);
            self.cells[last] += 1;
        }

        let mut captured = 0;
        if side.owns_pit(last) && self.cells[last] == 1 {
            let opposite = mirror(last);
            let stolen = self.cells[opposite];
            if stolen > 0 {
                captured = stolen + 1;
                self.cells[opposite] = 0;
                self.cells[last] = 0;
                self.cells[side.store_index()] += captured;
            }
        }
        Ok((last, captured))
    }

    /// Play `pit` (0-based) for `side`.
    ///
    /// On error the board is left untouched. On success the board holds the
    /// post-move state, with the end-game sweep applied if a side ran out.
    pub fn move_seeds(&mut self, pit: usize, side: Side) -> Result<MoveResult, BoardError> {
        let (last, captured) = self.sow(pit, side)?;
        let status = self.sweep();
        Ok(MoveResult {
            last,
            captured,
            extra_turn: last == side.store_index(),
            status,
        })
    }

    /// `side.sign()` if some pit of `side` ends its sowing in the side's own
    /// store, otherwise 0.
    pub fn can_get_extra_turn(&self, side: Side) -> i32 {
        let reaches_store = self.pits(side).iter().enumerate().any(|(pit, &seeds)| {
            seeds > 0 && landing(side.offset() + pit, side, seeds) == side.store_index()
        });
        if reaches_store { side.sign() } else { 0 }
    }

    /// Largest capture (mirror seeds plus the landing seed) any single move of
    /// `side` would make right now, signed by `side`.
    pub fn can_get_opponent_seeds(&self, side: Side) -> i32 {
        let best = self
            .legal_pits(side)
            .filter_map(|pit| {
                let mut scratch = self.clone();
                scratch.sow(pit, side).ok().map(|(_, captured)| captured)
            })
            .max()
            .unwrap_or(0);
        i32::from(best) * side.sign()
    }

    /// The board diagram produced by `Display`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let margin = " ".repeat(4);

        write!(f, "{margin}")?;
        for &seeds in self.pits(Side::North).iter().rev() {
            write!(f, "({seeds:>2})")?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "({:>2}){}({:>2})",
            self.store(Side::North),
            " ".repeat(4 * PITS),
            self.store(Side::South)
        )?;

        write!(f, "{margin}")?;
        for &seeds in self.pits(Side::South) {
            write!(f, "({seeds:>2})")?;
        }
        writeln!(f)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse counts separated by `,`, `;` or whitespace, in board layout order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let counts = s
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<u8>()
                    .map_err(|_| BoardError::InvalidCount(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_snapshot(&counts)
    }
}
