//! Engine error types.

use crate::Symbol;

/// Error raised by the engine.
///
/// Player input never produces one of these; rejected flips are reported
/// through [`FlipOutcome::Ignored`](crate::FlipOutcome::Ignored).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// A fixed layout does not contain exactly the expected number of cards.
    #[display("Deck must hold {} cards, got {}", expected, actual)]
    InvalidDeckSize {
        /// Required card count.
        expected: usize,
        /// Supplied card count.
        actual: usize,
    },

    /// A symbol in a fixed layout does not appear exactly twice.
    #[display("Symbol {} appears {} times, expected 2", symbol, count)]
    UnpairedSymbol {
        /// Offending symbol.
        symbol: Symbol,
        /// Number of occurrences found.
        count: usize,
    },

    /// Session state is corrupt. Unreachable through the public API.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for EngineError {}
