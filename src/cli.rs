//! Command-line interface for kwanduh.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kwanduh - grid trivia board game
#[derive(Parser, Debug)]
#[command(name = "kwanduh")]
#[command(about = "Grid trivia board game: join opposite corners with correct answers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the game configuration file
    #[arg(short, long, default_value = "kwanduh.toml", global = true)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Auto-play games with a simulated player and save the result
    Play {
        /// Board size (overrides the config)
        #[arg(short, long)]
        size: Option<usize>,

        /// Comma-separated topics (overrides the config)
        #[arg(short, long, value_delimiter = ',')]
        topics: Vec<String>,

        /// Random seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of games to play
        #[arg(short, long, default_value = "1")]
        games: usize,

        /// Probability the simulated player answers correctly
        #[arg(short, long, default_value = "0.75", value_parser = parse_probability)]
        accuracy: f64,

        /// Chance of spending a gimmee before answering
        #[arg(long, default_value = "0.1", value_parser = parse_probability)]
        replace_rate: f64,

        /// Ignore any saved state
        #[arg(long)]
        fresh: bool,
    },

    /// Print a generated blocked-cell layout
    Layout {
        /// Board size
        #[arg(short, long, default_value = "5")]
        size: usize,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print per-topic counters and totals from the saved state
    Stats,

    /// Delete the saved state
    Reset,
}

/// Parses a probability in `0.0..=1.0`, rejecting NaN and infinities.
fn parse_probability(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .parse()
        .map_err(|e| format!("`{}` is not a number: {}", text, e))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("`{}` is not between 0 and 1", text))
    }
}
