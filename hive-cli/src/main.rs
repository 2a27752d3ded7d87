//! Hive CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive game on stdin
//! - match: Automated games with a summary
//! - ruleset: Write the standard rule set as JSON

mod match_cmd;
mod play_cmd;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hive_core::RuleSet;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Placement-only Hive engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game, typing moves for human colors
    Play(play_cmd::PlayArgs),
    /// Play automated games and report results
    Match(match_cmd::MatchArgs),
    /// Write the standard rule set to a file
    Ruleset {
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `match --json` output stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Match(args) => match_cmd::run(args),
        Commands::Ruleset { output } => {
            RuleSet::default()
                .save(&output)
                .with_context(|| format!("Failed to write ruleset: {}", output.display()))?;
            tracing::info!("Wrote standard ruleset to {}", output.display());
            Ok(())
        }
    }
}
