//! Memory Match - Unified CLI
//!
//! Runs the terminal game or prints the high-score table.

#![warn(missing_docs)]

mod cli;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use memory_match::{LobbyController, ScoreRepository, SessionController, Settings};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,memory_match=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(&cli.config)?;
    if let Some(db_path) = cli.db_path {
        settings = settings.with_db_path(db_path);
    }

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_game(settings).await,
        Command::Scores { limit } => {
            let limit = limit.unwrap_or(*settings.top_scores_limit());
            print_scores(settings, limit)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Run the terminal game
async fn run_game(settings: Settings) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(settings.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(db_path = %settings.db_path(), "Starting Memory Match");

    let repository = ScoreRepository::open(settings.db_path().clone())?;
    let (session, events) = SessionController::new(Arc::new(repository), settings.timings());
    let mut lobby = LobbyController::new(session, events, *settings.top_scores_limit());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = lobby.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "Lobby exited with error");
    }
    info!("Memory Match exited");
    result
}

/// Print the best scores to stdout
#[instrument(skip(settings))]
fn print_scores(settings: Settings, limit: usize) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();

    let repository = ScoreRepository::open(settings.db_path().clone())?;
    let scores = repository.get_top_scores(limit)?;

    if scores.is_empty() {
        println!("No scores recorded yet.");
        return Ok(());
    }

    println!("{:>3}  {:<20} {:>6} {:>6} {:>6}", "#", "Player", "Moves", "Time", "Errors");
    for (rank, score) in scores.iter().enumerate() {
        println!(
            "{:>3}  {:<20} {:>6} {:>5}s {:>6}",
            rank + 1,
            score.player_name(),
            score.moves(),
            score.time(),
            score.errors()
        );
    }
    Ok(())
}
