//! Memory Match library - card-pairs game with a persistent high-score table
//!
//! # Architecture
//!
//! - **Engine**: pure game rules live in the `memory_engine` crate
//! - **Session**: [`SessionController`] drives one game at a time, owns its
//!   timers and persists the score when the board is cleared
//! - **Database**: [`ScoreRepository`] stores scores in SQLite via diesel
//! - **Lobby**: terminal screens (menu, name input, game, best scores)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use memory_match::{ScoreRepository, SessionController, SessionTimings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(ScoreRepository::open("memory_game.db".to_string())?);
//! let (controller, mut events) = SessionController::new(store, SessionTimings::default());
//!
//! let session = controller.start_session("Ana")?;
//! while let Some(event) = events.recv().await {
//!     if *event.session() == session {
//!         println!("{:?}", event.kind());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod lobby;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, SessionTimings, Settings};

// Crate-level exports - Database
pub use db::{DbError, DbErrorKind, NewScore, Score, ScoreRepository, ScoreStore, TOP_SCORES_LIMIT};

// Crate-level exports - Session management
pub use session::{SessionController, SessionError, SessionEvent, SessionEventKind, SessionId};

// Crate-level exports - Lobby
pub use lobby::{
    BestScoresScreen, InGameScreen, LobbyController, MainMenuScreen, NameInputScreen, Screen,
    ScreenTransition,
};

// Crate-level exports - Game types
pub use memory_engine::{
    BoardSnapshot, CARD_COUNT, Counters, Deck, FlipOutcome, GamePhase, IgnoreReason, MemoryGame,
    Symbol,
};
