//! Core domain types for the memory game.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Number of distinct symbols on a board.
pub const PAIR_COUNT: usize = 8;

/// Number of cards on a board.
pub const CARD_COUNT: usize = PAIR_COUNT * 2;

/// Cards per row when the board is laid out as a grid.
pub const GRID_COLUMNS: usize = 4;

/// Face of a card. Every board carries each symbol exactly twice.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Symbol {
    /// Red face.
    Red,
    /// Green face.
    Green,
    /// Blue face.
    Blue,
    /// Yellow face.
    Yellow,
    /// Magenta face.
    Magenta,
    /// Cyan face.
    Cyan,
    /// Gray face.
    Gray,
    /// Black face.
    Black,
}

impl Symbol {
    /// Returns the full palette in declaration order.
    pub fn palette() -> Vec<Symbol> {
        Symbol::iter().collect()
    }
}

/// A card at a fixed board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    position: usize,
    symbol: Symbol,
}

impl Card {
    pub(crate) fn new(position: usize, symbol: Symbol) -> Self {
        Self { position, symbol }
    }

    /// Board position (0-based, row-major).
    pub fn position(&self) -> usize {
        self.position
    }

    /// The card's face.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }
}

/// Phase of a game session.
///
/// `Preview` only ever leads to `NotStarted`, which leads to `Active` on
/// the first accepted flip. Nothing leaves `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
pub enum GamePhase {
    /// Whole board shown face up so the player can memorize it.
    #[default]
    Preview,
    /// Waiting for the first flip.
    NotStarted,
    /// Flips are being counted and the clock is running.
    Active,
    /// Every pair has been matched.
    Finished,
}

impl GamePhase {
    /// Returns true once the first flip has been accepted.
    pub fn is_started(self) -> bool {
        matches!(self, Self::Active | Self::Finished)
    }

    /// Returns true if no further mutation is possible.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Session counters: attempts, failed attempts and seconds played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Counters {
    /// Completed two-card attempts.
    pub moves: u32,
    /// Attempts whose two cards did not match.
    pub errors: u32,
    /// Seconds elapsed while the session was active.
    pub elapsed_seconds: u32,
}
