//! Command-line interface for memory_match.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Memory Match - find every pair in as few moves as possible
#[derive(Parser, Debug)]
#[command(name = "memory_match")]
#[command(about = "Terminal memory-matching game with a high-score table", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML). Missing file means defaults.
    #[arg(short, long, default_value = "memory_match.toml", global = true)]
    pub config: PathBuf,

    /// Path to the score database (overrides the settings file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run; defaults to `play`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal UI
    Play,

    /// Print the best scores and exit
    Scores {
        /// Number of rows to print (overrides the settings file)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
