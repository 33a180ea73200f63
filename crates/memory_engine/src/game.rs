//! The session state machine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    BoardSnapshot, CARD_COUNT, Counters, Deck, EngineError, FlipOutcome, GamePhase, IgnoreReason,
};

/// One game session: a dealt deck plus the flip/match state.
///
/// Each position is in exactly one of three states at any time: hidden,
/// flipped (face up, at most two) or matched. The session is mutated only
/// through [`MemoryGame::request_flip`] and the timer hooks
/// ([`end_preview`](MemoryGame::end_preview),
/// [`clear_mismatch`](MemoryGame::clear_mismatch),
/// [`tick`](MemoryGame::tick)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryGame {
    deck: Deck,
    phase: GamePhase,
    flipped: Vec<usize>,
    matched: BTreeSet<usize>,
    counters: Counters,
}

impl MemoryGame {
    /// Creates a session that opens with the whole board shown.
    ///
    /// Flip requests are ignored until [`MemoryGame::end_preview`] is called.
    #[instrument(skip(deck))]
    pub fn new(deck: Deck) -> Self {
        info!("Creating memory game in preview");
        Self {
            deck,
            phase: GamePhase::Preview,
            flipped: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            counters: Counters::default(),
        }
    }

    /// Creates a session that accepts flips immediately.
    #[instrument(skip(deck))]
    pub fn without_preview(deck: Deck) -> Self {
        let mut game = Self::new(deck);
        game.end_preview();
        game
    }

    /// Hides the preview layout. Returns false if the preview already ended.
    #[instrument(skip(self))]
    pub fn end_preview(&mut self) -> bool {
        if self.phase != GamePhase::Preview {
            return false;
        }
        self.phase = GamePhase::NotStarted;
        debug!("Preview ended");
        true
    }

    /// Flips the card at `index`.
    ///
    /// Requests that cannot apply (preview, finished session, out of range,
    /// card already matched or face up, pair pending) are no-ops reported as
    /// [`FlipOutcome::Ignored`]. The first accepted flip starts the session.
    /// Completing a pair counts one move; a mismatch also counts one error
    /// and leaves both cards face up until [`MemoryGame::clear_mismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] if the session state is
    /// found corrupt after the flip.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn request_flip(&mut self, index: usize) -> Result<FlipOutcome, EngineError> {
        if let Some(reason) = self.rejection(index) {
            debug!(index, reason = %reason, "Flip ignored");
            return Ok(FlipOutcome::Ignored(reason));
        }

        if self.phase == GamePhase::NotStarted {
            info!("First flip accepted, session active");
            self.phase = GamePhase::Active;
        }

        self.flipped.push(index);
        let outcome = if self.flipped.len() == 2 {
            self.resolve_pair()
        } else {
            FlipOutcome::Revealed { index }
        };

        self.check_invariants()?;
        Ok(outcome)
    }

    fn rejection(&self, index: usize) -> Option<IgnoreReason> {
        if self.phase == GamePhase::Preview {
            Some(IgnoreReason::Previewing)
        } else if self.phase.is_finished() {
            Some(IgnoreReason::Finished)
        } else if index >= self.deck.len() {
            Some(IgnoreReason::OutOfRange)
        } else if self.matched.contains(&index) {
            Some(IgnoreReason::AlreadyMatched)
        } else if self.flipped.contains(&index) {
            Some(IgnoreReason::AlreadyFlipped)
        } else if self.flipped.len() >= 2 {
            Some(IgnoreReason::PairPending)
        } else {
            None
        }
    }

    fn resolve_pair(&mut self) -> FlipOutcome {
        self.counters.moves = self.counters.moves.saturating_add(1);
        let (first, second) = (self.flipped[0], self.flipped[1]);

        if self.deck.symbol_at(first) == self.deck.symbol_at(second) {
            // Both indices move in the same call; no snapshot can see half a pair.
            self.matched.extend(self.flipped.drain(..));
            debug!(first, second, matched = self.matched.len(), "Pair matched");

            if self.matched.len() == CARD_COUNT {
                self.phase = GamePhase::Finished;
                info!(
                    moves = self.counters.moves,
                    errors = self.counters.errors,
                    seconds = self.counters.elapsed_seconds,
                    "All pairs matched"
                );
                return FlipOutcome::Completed(self.counters);
            }
            FlipOutcome::Matched { first, second }
        } else {
            self.counters.errors = self.counters.errors.saturating_add(1);
            debug!(first, second, errors = self.counters.errors, "Pair mismatched");
            FlipOutcome::Mismatched { first, second }
        }
    }

    /// Turns a mismatched pair face down again.
    ///
    /// Returns false when no mismatched pair is pending.
    #[instrument(skip(self))]
    pub fn clear_mismatch(&mut self) -> bool {
        if self.flipped.len() != 2 {
            return false;
        }
        debug!(cards = ?self.flipped, "Clearing mismatched pair");
        self.flipped.clear();
        true
    }

    /// Advances the clock by one second. Only counts while active.
    pub fn tick(&mut self) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }
        self.counters.elapsed_seconds = self.counters.elapsed_seconds.saturating_add(1);
        true
    }

    /// Verifies the set invariants of the session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] describing the first
    /// broken invariant.
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        let violation = if self.flipped.len() > 2 {
            Some(format!("{} cards flipped", self.flipped.len()))
        } else if self.matched.len() % 2 != 0 {
            Some(format!("odd matched count {}", self.matched.len()))
        } else if let Some(i) = self.flipped.iter().find(|i| self.matched.contains(*i)) {
            Some(format!("card {} both flipped and matched", i))
        } else if self.phase.is_finished() != (self.matched.len() == CARD_COUNT) {
            Some(format!(
                "phase {} with {} matched cards",
                self.phase,
                self.matched.len()
            ))
        } else {
            None
        };

        match violation {
            Some(message) => {
                error!(message = %message, "Memory game invariant violated");
                Err(EngineError::InvariantViolation(message))
            }
            None => Ok(()),
        }
    }

    /// Returns an immutable view of the current state.
    pub fn snapshot(&self) -> BoardSnapshot {
        let revealed = if self.phase == GamePhase::Preview {
            (0..self.deck.len()).collect()
        } else {
            self.flipped.clone()
        };
        BoardSnapshot::new(
            self.phase,
            revealed,
            self.matched.iter().copied().collect(),
            self.counters,
        )
    }

    /// Returns the dealt deck.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Returns the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns the current counters.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Face-up, unmatched positions in flip order.
    pub fn flipped(&self) -> &[usize] {
        &self.flipped
    }

    /// Matched positions.
    pub fn matched(&self) -> &BTreeSet<usize> {
        &self.matched
    }

    /// Returns true once every pair is matched.
    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }
}
