//! Local game referee.
//!
//! [`Game`] tracks whose turn it is on top of a [`Board`], applying the
//! extra-turn rule between moves, and reports the winner once a side runs out
//! of seeds. [`play_game`] runs a whole game between two [`Player`]s.

use std::fmt;

use fastrand::Rng;
use log::debug;

use crate::board::{Board, BoardError, MoveResult, Side};
use crate::minimax::{SearchConfig, SearchResult, search, utility};

/// Final result of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(side) => write!(f, "{side} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A board plus the side to move.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Side,
    plies: usize,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A fresh board with side 0 to move.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Side::South)
    }

    pub fn from_board(board: Board, to_move: Side) -> Self {
        Self {
            board,
            to_move,
            plies: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Moves played so far, extra turns included.
    pub fn plies(&self) -> usize {
        self.plies
    }

    /// Sow `pit` (0-based) for the side to move.
    ///
    /// The turn passes to the opponent unless the last seed reached the
    /// mover's store. A failed move changes nothing.
    pub fn play(&mut self, pit: usize) -> Result<MoveResult, BoardError> {
        let result = self.board.move_seeds(pit, self.to_move)?;
        self.plies += 1;
        if !result.extra_turn {
            self.to_move = self.to_move.opponent();
        }
        Ok(result)
    }

    pub fn is_over(&self) -> bool {
        self.board.status().is_over()
    }

    /// The winner by store count, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over() {
            return None;
        }
        let outcome = match utility(&self.board) {
            0 => Outcome::Draw,
            score if score > 0 => Outcome::Win(Side::South),
            _ => Outcome::Win(Side::North),
        };
        Some(outcome)
    }

    /// Search for the side to move. The board is swapped first when side 1
    /// moves, so the search always plays side 0; the returned pit is 1-based
    /// and relative to the mover's own row either way.
    pub fn best_move(&self, config: &SearchConfig) -> SearchResult {
        let mut board = self.board.clone();
        if self.to_move == Side::North {
            board.swap();
        }
        search(&board, config)
    }
}

/// Who picks the moves for one side.
#[derive(Clone, Debug)]
pub enum Player {
    /// Iterative-deepening minimax with the given limits
    Engine(SearchConfig),
    /// A uniformly random legal pit
    Random,
}

impl Player {
    /// A 0-based pit for the side to move, or `None` if it has no legal move.
    pub fn choose(&self, game: &Game, rng: &mut Rng) -> Option<usize> {
        match self {
            Player::Engine(config) => game.best_move(config).best_pit.map(|pit| pit - 1),
            Player::Random => {
                let pits: Vec<usize> = game.board().legal_pits(game.to_move()).collect();
                if pits.is_empty() {
                    None
                } else {
                    Some(pits[rng.usize(..pits.len())])
                }
            }
        }
    }
}

/// Play a game from the start position until a side runs out of seeds.
pub fn play_game(south: &Player, north: &Player, rng: &mut Rng) -> Result<Game, BoardError> {
    let mut game = Game::new();
    while !game.is_over() {
        let mover = game.to_move();
        let player = match mover {
            Side::South => south,
            Side::North => north,
        };
        let Some(pit) = player.choose(&game, rng) else {
            break;
        };
        let result = game.play(pit)?;
        debug!(
            "ply {}: {mover} sowed pit {}, captured {}, extra turn {}",
            game.plies(),
            pit + 1,
            result.captured,
            result.extra_turn
        );
    }
    Ok(game)
}
