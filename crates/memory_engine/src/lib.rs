//! Memory-matching game logic.
//!
//! This crate holds the rules of the card-pairs game and nothing else:
//! no timers, no storage, no rendering. Time-dependent behavior (the
//! preview pause, the mismatch pause and the elapsed-time ticker) is
//! exposed as plain methods that a driver calls when its own timers fire.
//!
//! # Example
//!
//! ```
//! use memory_engine::{Deck, FlipOutcome, MemoryGame};
//!
//! let mut game = MemoryGame::without_preview(Deck::generate());
//! let outcome = game.request_flip(0).expect("engine invariants hold");
//! assert!(matches!(outcome, FlipOutcome::Revealed { index: 0 }));
//! assert_eq!(game.counters().moves, 0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod deck;
mod error;
mod game;
mod outcome;
mod types;

pub use deck::Deck;
pub use error::EngineError;
pub use game::MemoryGame;
pub use outcome::{BoardSnapshot, FlipOutcome, IgnoreReason};
pub use types::{CARD_COUNT, Card, Counters, GRID_COLUMNS, GamePhase, PAIR_COUNT, Symbol};
