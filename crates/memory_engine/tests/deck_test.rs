//! Tests for deck generation.

use std::collections::HashMap;

use memory_engine::{CARD_COUNT, Deck, EngineError, PAIR_COUNT, Symbol};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn symbol_counts(deck: &Deck) -> HashMap<Symbol, usize> {
    let mut counts = HashMap::new();
    for card in deck.cards() {
        *counts.entry(card.symbol()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_generate_deals_eight_pairs() {
    for _ in 0..50 {
        let deck = Deck::generate();
        assert_eq!(deck.len(), CARD_COUNT);

        let counts = symbol_counts(&deck);
        assert_eq!(counts.len(), PAIR_COUNT);
        assert!(counts.values().all(|c| *c == 2), "counts: {counts:?}");
    }
}

#[test]
fn test_card_positions_match_board_order() {
    let deck = Deck::generate();
    for (i, card) in deck.cards().iter().enumerate() {
        assert_eq!(card.position(), i);
        assert_eq!(deck.symbol_at(i), Some(card.symbol()));
    }
    assert_eq!(deck.symbol_at(CARD_COUNT), None);
}

#[test]
fn test_shuffled_is_deterministic_for_seed() {
    let a = Deck::shuffled(&mut StdRng::seed_from_u64(7));
    let b = Deck::shuffled(&mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
}

#[test]
fn test_shuffle_varies_layout() {
    let mut rng = StdRng::seed_from_u64(42);
    let first = Deck::shuffled(&mut rng);
    let differs = (0..20).any(|_| Deck::shuffled(&mut rng) != first);
    assert!(differs, "20 shuffles produced the same layout");
}

#[test]
fn test_shuffle_spreads_symbols_over_positions() {
    // Every position should see every symbol over enough deals.
    let mut rng = StdRng::seed_from_u64(1234);
    let mut seen = vec![std::collections::HashSet::new(); CARD_COUNT];
    for _ in 0..2000 {
        let deck = Deck::shuffled(&mut rng);
        for card in deck.cards() {
            seen[card.position()].insert(card.symbol());
        }
    }
    assert!(seen.iter().all(|s| s.len() == PAIR_COUNT));
}

#[test]
fn test_from_symbols_accepts_paired_layout() {
    let symbols: Vec<Symbol> = Symbol::palette().into_iter().flat_map(|s| [s, s]).collect();
    let deck = Deck::from_symbols(&symbols).expect("valid layout");
    assert_eq!(deck.symbol_at(0), Some(Symbol::Red));
    assert_eq!(deck.symbol_at(1), Some(Symbol::Red));
    assert_eq!(deck.symbol_at(15), Some(Symbol::Black));
}

#[test]
fn test_from_symbols_rejects_wrong_length() {
    let result = Deck::from_symbols(&[Symbol::Red, Symbol::Red]);
    assert_eq!(
        result,
        Err(EngineError::InvalidDeckSize {
            expected: CARD_COUNT,
            actual: 2
        })
    );
}

#[test]
fn test_from_symbols_rejects_unpaired_symbol() {
    let mut symbols: Vec<Symbol> = Symbol::palette().into_iter().flat_map(|s| [s, s]).collect();
    symbols[1] = Symbol::Green;
    let result = Deck::from_symbols(&symbols);
    assert!(matches!(
        result,
        Err(EngineError::UnpairedSymbol {
            symbol: Symbol::Red,
            count: 1
        })
    ));
}
