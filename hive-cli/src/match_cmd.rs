//! Match command - automated games between two search depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_ruleset(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hive_core::{AlphaBetaSelector, Color, GameResult, PlayerSetup, RuleSet, Session};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Base ruleset JSON file (standard game if omitted)
    #[arg(long, value_name = "FILE")]
    pub ruleset: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Black search depth (0 takes the first legal placement)
    #[arg(long, default_value = "1")]
    pub black_depth: u32,

    /// White search depth (0 takes the first legal placement)
    #[arg(long, default_value = "1")]
    pub white_depth: u32,

    /// Seed for tie-breaking between equally scored placements
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum actions (placements and passes) per game
    #[arg(long, default_value = "200")]
    pub max_actions: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, PartialEq)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    actions: usize,
    turns: u32,
    pieces_placed: usize,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    black_wins: usize,
    white_wins: usize,
    draws: usize,
    unfinished: usize,
    avg_actions: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Load the base ruleset
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs) -> Result<()> {
    let base = load_ruleset(&args)?;

    tracing::info!(
        "Starting match on {}: black depth {} vs white depth {} ({} games)",
        base.name,
        args.black_depth,
        args.white_depth,
        args.games
    );

    let results = play_match(&base, &args);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_ruleset(args: &MatchArgs) -> Result<RuleSet> {
    match &args.ruleset {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("Failed to load ruleset: {}", path.display())),
        None => Ok(RuleSet::default()),
    }
}

/// Play all games in the match
fn play_match(base: &RuleSet, args: &MatchArgs) -> MatchResults {
    let mut rng = create_rng(args.seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let game_seed = rng.gen::<u64>();
        let record = play_single_game(base, game_num + 1, args, game_seed);

        tracing::info!(
            "Game {}: {:?} ({} actions, turn {})",
            record.game_number,
            record.result,
            record.actions,
            record.turns
        );

        games.push(record);
    }

    compute_match_statistics(games)
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one fully automated game
fn play_single_game(base: &RuleSet, game_number: usize, args: &MatchArgs, game_seed: u64) -> GameRecord {
    let ruleset = RuleSet {
        black: PlayerSetup::automated(Some(args.black_depth)),
        white: PlayerSetup::automated(Some(args.white_depth)),
        ..base.clone()
    };

    let mut session = Session::from_ruleset(&ruleset);
    for color in Color::ALL {
        if let Some(depth) = ruleset.setup(color).search_depth.filter(|&d| d > 0) {
            let selector = AlphaBetaSelector::with_seed(depth, game_seed ^ color.index() as u64);
            session = session.with_selector(color, Box::new(selector));
        }
    }

    let result = session.play_automated(args.max_actions);
    let final_state = session.current();

    GameRecord {
        game_number,
        result,
        actions: session.history().len(),
        turns: final_state.turn(),
        pieces_placed: final_state.occupied_coordinates().len(),
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let black_wins = count(GameResult::BlackWins);
    let white_wins = count(GameResult::WhiteWins);
    let draws = count(GameResult::Draw);
    let unfinished = count(GameResult::Ongoing);

    let total_actions: usize = games.iter().map(|g| g.actions).sum();
    let avg_actions = if games.is_empty() {
        0.0
    } else {
        total_actions as f32 / games.len() as f32
    };

    MatchResults {
        games,
        black_wins,
        white_wins,
        draws,
        unfinished,
        avg_actions,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: GameResult,
        actions: usize,
        turns: u32,
        pieces_placed: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        black_wins: usize,
        white_wins: usize,
        draws: usize,
        unfinished: usize,
        avg_actions: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        black_wins: results.black_wins,
        white_wins: results.white_wins,
        draws: results.draws,
        unfinished: results.unfinished,
        avg_actions: results.avg_actions,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: g.result,
                actions: g.actions,
                turns: g.turns,
                pieces_placed: g.pieces_placed,
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize results: {}", e),
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        percent(results.white_wins, total)
    );
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    if results.unfinished > 0 {
        println!("Unfinished:  {}", results.unfinished);
    }
    println!("Avg actions: {:.1}", results.avg_actions);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} after {} actions ({} pieces placed)",
            game.game_number, game.result, game.actions, game.pieces_placed
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
