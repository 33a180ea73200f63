//! Deck generation.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{CARD_COUNT, Card, EngineError, Symbol};

/// Ordered sequence of the cards dealt for one session.
///
/// Every symbol of the palette appears on exactly two cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deals a shuffled deck using the thread-local RNG.
    #[instrument]
    pub fn generate() -> Self {
        Self::shuffled(&mut rand::thread_rng())
    }

    /// Deals a shuffled deck using the given RNG.
    ///
    /// The shuffle is Fisher-Yates, so every permutation of the sixteen
    /// cards is equally likely for a uniform RNG.
    #[instrument(skip(rng))]
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut symbols: Vec<Symbol> = Symbol::palette().into_iter().flat_map(|s| [s, s]).collect();
        symbols.shuffle(rng);
        debug!(layout = ?symbols, "Deck shuffled");
        Self::from_ordered(symbols)
    }

    /// Builds a deck with a fixed layout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDeckSize`] if `symbols` is not
    /// [`CARD_COUNT`] long, or [`EngineError::UnpairedSymbol`] if a symbol
    /// does not appear exactly twice.
    #[instrument]
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self, EngineError> {
        if symbols.len() != CARD_COUNT {
            return Err(EngineError::InvalidDeckSize {
                expected: CARD_COUNT,
                actual: symbols.len(),
            });
        }

        for symbol in Symbol::palette() {
            let count = symbols.iter().filter(|s| **s == symbol).count();
            if count != 2 {
                return Err(EngineError::UnpairedSymbol { symbol, count });
            }
        }

        Ok(Self::from_ordered(symbols.to_vec()))
    }

    fn from_ordered(symbols: Vec<Symbol>) -> Self {
        let cards = symbols
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| Card::new(position, symbol))
            .collect();
        Self { cards }
    }

    /// Returns all cards in board order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the symbol at `index`, or `None` if out of range.
    pub fn symbol_at(&self, index: usize) -> Option<Symbol> {
        self.cards.get(index).map(Card::symbol)
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// A dealt deck is never empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
