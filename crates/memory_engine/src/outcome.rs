//! Results of engine operations and read-only board views.
//!
//! Flips are domain events: the engine reports what a request did
//! instead of exposing its mutable sets to the caller.

use serde::{Deserialize, Serialize};

use crate::{Counters, GamePhase};

/// Why a flip request was dropped without changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum IgnoreReason {
    /// The layout is still being shown to the player.
    #[display("board is in preview")]
    Previewing,
    /// The session is over.
    #[display("session is finished")]
    Finished,
    /// No card exists at that index.
    #[display("index is out of range")]
    OutOfRange,
    /// The card already belongs to a matched pair.
    #[display("card is already matched")]
    AlreadyMatched,
    /// The card is already face up.
    #[display("card is already flipped")]
    AlreadyFlipped,
    /// Two cards are face up waiting to be cleared.
    #[display("a pair is already face up")]
    PairPending,
}

/// Effect of a flip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// First card of an attempt turned face up.
    Revealed {
        /// Flipped position.
        index: usize,
    },
    /// Second card matched the first; both are now matched.
    Matched {
        /// Position flipped first.
        first: usize,
        /// Position flipped second.
        second: usize,
    },
    /// Second card differed from the first; both stay face up until
    /// [`MemoryGame::clear_mismatch`](crate::MemoryGame::clear_mismatch).
    Mismatched {
        /// Position flipped first.
        first: usize,
        /// Position flipped second.
        second: usize,
    },
    /// Final pair matched and the session is finished.
    Completed(Counters),
}

impl FlipOutcome {
    /// Returns true if the request changed state.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }

    /// Returns true if the request completed a two-card attempt.
    pub fn is_attempt(&self) -> bool {
        matches!(
            self,
            Self::Matched { .. } | Self::Mismatched { .. } | Self::Completed(_)
        )
    }
}

/// Immutable view of a session, emitted after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    phase: GamePhase,
    revealed: Vec<usize>,
    matched: Vec<usize>,
    counters: Counters,
}

impl BoardSnapshot {
    pub(crate) fn new(
        phase: GamePhase,
        revealed: Vec<usize>,
        matched: Vec<usize>,
        counters: Counters,
    ) -> Self {
        Self {
            phase,
            revealed,
            matched,
            counters,
        }
    }

    /// Phase at the time of the snapshot.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Face-up cards that are not matched, in flip order. During the
    /// preview this is every position.
    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    /// Matched positions in ascending order.
    pub fn matched(&self) -> &[usize] {
        &self.matched
    }

    /// Counters at the time of the snapshot.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Returns true if the card at `index` should be drawn face up.
    pub fn is_face_up(&self, index: usize) -> bool {
        self.revealed.contains(&index) || self.matched.contains(&index)
    }
}
