//! Kalaha-Rust: a Kalaha minimax player.
//!
//! ## Usage
//!
//! - `kalaha-rust` - Show a demo
//! - `kalaha-rust best-move "6,6,6,6,6,6,0,6,6,6,6,6,6,0"` - Pick a move for a board
//! - `kalaha-rust match --games 4 --opponent random` - Play a series of games
//!
//! Set `RUST_LOG=debug` to trace every deepening iteration.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use kalaha_rust::board::{Board, Side};
use kalaha_rust::constants::{
    DEFAULT_GAMES, DEFAULT_START_DEPTH, DEFAULT_TIME_LIMIT_MS, MAX_SEARCH_DEPTH,
};
use kalaha_rust::game::{Game, Outcome, Player, play_game};
use kalaha_rust::minimax::SearchConfig;

/// Kalaha-Rust: a Kalaha minimax player
#[derive(Parser)]
#[command(name = "kalaha-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the opening position and show the chosen move
    Demo(SearchArgs),
    /// Choose a move for a board given as 14 counts: side 0 pits, side 0 store,
    /// side 1 pits, side 1 store
    BestMove {
        /// Seed counts separated by commas, semicolons or spaces
        board: String,
        /// Side to move (0 or 1)
        #[arg(long, default_value_t = 0)]
        side: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a series of games against an opponent, alternating seats
    Match {
        #[arg(long, default_value_t = DEFAULT_GAMES)]
        games: usize,
        #[arg(long, value_enum, default_value_t = Opponent::Random)]
        opponent: Opponent,
        /// Seed for the random opponent
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Depth of the first deepening iteration
    #[arg(long, default_value_t = DEFAULT_START_DEPTH)]
    depth: u32,
    /// Time budget per move in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_MS)]
    time_ms: u64,
    /// Depth at which deepening stops
    #[arg(long, default_value_t = MAX_SEARCH_DEPTH)]
    max_depth: u32,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            start_depth: self.depth,
            time_limit: Duration::from_millis(self.time_ms),
            max_depth: self.max_depth,
        }
    }
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            depth: DEFAULT_START_DEPTH,
            time_ms: DEFAULT_TIME_LIMIT_MS,
            max_depth: MAX_SEARCH_DEPTH,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum Opponent {
    /// The same engine
    Engine,
    /// Uniformly random legal moves
    Random,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::BestMove {
            board,
            side,
            search,
        }) => best_move(&board, side, &search.config()),
        Some(Commands::Match {
            games,
            opponent,
            seed,
            search,
        }) => run_match(games, opponent, seed, &search.config()),
        Some(Commands::Demo(search)) => {
            run_demo(&search.config());
            Ok(())
        }
        None => {
            run_demo(&SearchArgs::default().config());
            Ok(())
        }
    }
}

fn run_demo(config: &SearchConfig) {
    println!("Kalaha-Rust: minimax Kalaha player\n");

    let game = Game::new();
    println!("{}", game.board());

    println!("Searching for up to {:?}...", config.time_limit);
    let result = game.best_move(config);
    match result.best_pit {
        Some(pit) => println!("Best move: pit {pit} (utility {})", result.utility),
        None => println!("No legal move"),
    }
    println!(
        "Reached depth {} in {} iterations, {} nodes, {:?}",
        result.depth, result.iterations, result.nodes, result.elapsed
    );
}

fn best_move(board: &str, side: usize, config: &SearchConfig) -> Result<()> {
    let board: Board = board
        .parse()
        .with_context(|| format!("failed to parse board {board:?}"))?;
    let side = Side::try_from(side).context("invalid side to move")?;

    print!("{board}");
    let game = Game::from_board(board, side);
    if let Some(outcome) = game.outcome() {
        println!("Game over: {outcome}");
        return Ok(());
    }

    let result = game.best_move(config);
    let pit = result
        .best_pit
        .context("search returned no move for an active board")?;
    println!("{pit}");
    Ok(())
}

fn run_match(games: usize, opponent: Opponent, seed: u64, config: &SearchConfig) -> Result<()> {
    let engine = Player::Engine(config.clone());
    let rival = match opponent {
        Opponent::Engine => Player::Engine(config.clone()),
        Opponent::Random => Player::Random,
    };
    let mut rng = fastrand::Rng::with_seed(seed);

    let mut engine_wins = 0;
    let mut rival_wins = 0;
    let mut draws = 0;

    for round in 0..games {
        // The engine opens on even rounds.
        let engine_side = if round % 2 == 0 { Side::South } else { Side::North };
        let (south, north) = match engine_side {
            Side::South => (&engine, &rival),
            Side::North => (&rival, &engine),
        };

        let game = play_game(south, north, &mut rng)
            .with_context(|| format!("game {} ended with an illegal move", round + 1))?;
        let outcome = game.outcome().context("game stopped before it was over")?;

        println!("\nGame {} (engine plays {engine_side}), final board:", round + 1);
        print!("{}", game.board());
        println!("{outcome} after {} plies", game.plies());

        match outcome {
            Outcome::Win(side) if side == engine_side => engine_wins += 1,
            Outcome::Win(_) => rival_wins += 1,
            Outcome::Draw => draws += 1,
        }
    }

    println!("\nEngine {engine_wins}, opponent {rival_wins}, draws {draws}");
    Ok(())
}
