//! Tests for the memory game state machine.

use memory_engine::{
    CARD_COUNT, Counters, Deck, EngineError, FlipOutcome, GamePhase, IgnoreReason, MemoryGame,
    Symbol,
};

/// Positions 0 and 2 hold the same symbol, 1 and 3 hold another; the rest
/// are adjacent pairs.
fn interleaved_deck() -> Deck {
    use Symbol::*;
    Deck::from_symbols(&[
        Red, Green, Red, Green, Blue, Blue, Yellow, Yellow, Magenta, Magenta, Cyan, Cyan, Gray,
        Gray, Black, Black,
    ])
    .expect("valid layout")
}

fn flip(game: &mut MemoryGame, index: usize) -> FlipOutcome {
    game.request_flip(index).expect("invariants hold")
}

/// Pairs of positions sharing a symbol, in board order of first occurrence.
fn pairs(deck: &Deck) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, card) in deck.cards().iter().enumerate() {
        if let Some(j) = (i + 1..deck.len()).find(|j| deck.symbol_at(*j) == Some(card.symbol())) {
            pairs.push((i, j));
        }
    }
    pairs
}

#[test]
fn test_new_game_starts_in_preview_with_board_revealed() {
    let game = MemoryGame::new(interleaved_deck());
    assert_eq!(game.phase(), GamePhase::Preview);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.revealed().len(), CARD_COUNT);
    assert!(snapshot.matched().is_empty());
    assert!(game.flipped().is_empty());
}

#[test]
fn test_flips_during_preview_are_ignored() {
    let mut game = MemoryGame::new(interleaved_deck());

    assert_eq!(
        flip(&mut game, 0),
        FlipOutcome::Ignored(IgnoreReason::Previewing)
    );
    assert_eq!(
        flip(&mut game, 2),
        FlipOutcome::Ignored(IgnoreReason::Previewing)
    );
    assert_eq!(game.counters(), Counters::default());
    assert_eq!(game.phase(), GamePhase::Preview);
}

#[test]
fn test_end_preview_hides_board_once() {
    let mut game = MemoryGame::new(interleaved_deck());
    assert!(game.end_preview());
    assert!(!game.end_preview());

    assert_eq!(game.phase(), GamePhase::NotStarted);
    assert!(game.snapshot().revealed().is_empty());
}

#[test]
fn test_first_flip_after_preview_counts_normally() {
    let mut game = MemoryGame::new(interleaved_deck());
    game.end_preview();

    assert_eq!(flip(&mut game, 0), FlipOutcome::Revealed { index: 0 });
    assert_eq!(game.phase(), GamePhase::Active);
    assert_eq!(game.counters().moves, 0);
    assert_eq!(
        flip(&mut game, 2),
        FlipOutcome::Matched {
            first: 0,
            second: 2
        }
    );
    assert_eq!(game.counters().moves, 1);
}

#[test]
fn test_single_flip_does_not_count_a_move() {
    let mut game = MemoryGame::without_preview(interleaved_deck());
    flip(&mut game, 5);
    assert_eq!(game.counters().moves, 0);
    assert_eq!(game.flipped(), &[5]);
}

#[test]
fn test_mismatch_counts_move_and_error_and_waits_for_clear() {
    let mut game = MemoryGame::without_preview(interleaved_deck());

    flip(&mut game, 0);
    assert_eq!(
        flip(&mut game, 1),
        FlipOutcome::Mismatched {
            first: 0,
            second: 1
        }
    );
    assert_eq!(game.counters().moves, 1);
    assert_eq!(game.counters().errors, 1);
    assert_eq!(game.flipped(), &[0, 1]);

    assert_eq!(
        flip(&mut game, 4),
        FlipOutcome::Ignored(IgnoreReason::PairPending)
    );

    assert!(game.clear_mismatch());
    assert!(game.flipped().is_empty());
    assert!(!game.clear_mismatch());
}

#[test]
fn test_mismatch_then_match_scenario() {
    let mut game = MemoryGame::without_preview(interleaved_deck());

    flip(&mut game, 0);
    flip(&mut game, 1);
    game.clear_mismatch();

    flip(&mut game, 0);
    flip(&mut game, 2);

    assert_eq!(game.counters().moves, 2);
    assert_eq!(game.counters().errors, 1);
    assert!(game.matched().contains(&0));
    assert!(game.matched().contains(&2));
    assert!(game.flipped().is_empty());
}

#[test]
fn test_clear_mismatch_without_pending_pair_is_noop() {
    let mut game = MemoryGame::without_preview(interleaved_deck());
    flip(&mut game, 0);
    assert!(!game.clear_mismatch());
    assert_eq!(game.flipped(), &[0]);
}

#[test]
fn test_ignored_requests_leave_state_unchanged() {
    let mut game = MemoryGame::without_preview(interleaved_deck());
    flip(&mut game, 0);
    flip(&mut game, 2);
    flip(&mut game, 4);

    let before = game.clone();
    assert_eq!(
        flip(&mut game, 0),
        FlipOutcome::Ignored(IgnoreReason::AlreadyMatched)
    );
    assert_eq!(
        flip(&mut game, 4),
        FlipOutcome::Ignored(IgnoreReason::AlreadyFlipped)
    );
    assert_eq!(
        flip(&mut game, CARD_COUNT),
        FlipOutcome::Ignored(IgnoreReason::OutOfRange)
    );
    assert_eq!(
        flip(&mut game, usize::MAX),
        FlipOutcome::Ignored(IgnoreReason::OutOfRange)
    );
    assert_eq!(game, before);
}

#[test]
fn test_matching_all_pairs_finishes_game() {
    let deck = interleaved_deck();
    let pairs = pairs(&deck);
    let mut game = MemoryGame::without_preview(deck);

    let last = pairs.len() - 1;
    for (n, (a, b)) in pairs.into_iter().enumerate() {
        flip(&mut game, a);
        let outcome = flip(&mut game, b);
        if n == last {
            assert_eq!(
                outcome,
                FlipOutcome::Completed(Counters {
                    moves: 8,
                    errors: 0,
                    elapsed_seconds: 0
                })
            );
        } else {
            assert_eq!(outcome, FlipOutcome::Matched { first: a, second: b });
        }
    }

    assert!(game.is_finished());
    assert_eq!(game.matched().len(), CARD_COUNT);
}

#[test]
fn test_finished_game_rejects_all_mutation() {
    let deck = interleaved_deck();
    let pairs = pairs(&deck);
    let mut game = MemoryGame::without_preview(deck);
    for (a, b) in pairs {
        flip(&mut game, a);
        flip(&mut game, b);
    }

    let before = game.clone();
    for i in 0..CARD_COUNT {
        assert_eq!(
            flip(&mut game, i),
            FlipOutcome::Ignored(IgnoreReason::Finished)
        );
    }
    assert!(!game.tick());
    assert!(!game.clear_mismatch());
    assert_eq!(game, before);
}

#[test]
fn test_tick_only_counts_while_active() {
    let mut game = MemoryGame::new(interleaved_deck());
    assert!(!game.tick());
    game.end_preview();
    assert!(!game.tick());

    flip(&mut game, 3);
    assert!(game.tick());
    assert!(game.tick());
    assert_eq!(game.counters().elapsed_seconds, 2);
}

#[test]
fn test_completed_counters_include_elapsed_time() {
    let deck = interleaved_deck();
    let pairs = pairs(&deck);
    let mut game = MemoryGame::without_preview(deck);

    let mut outcome = None;
    for (a, b) in pairs {
        flip(&mut game, a);
        game.tick();
        outcome = Some(flip(&mut game, b));
    }

    match outcome {
        Some(FlipOutcome::Completed(counters)) => assert_eq!(counters.elapsed_seconds, 8),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn test_snapshot_reports_revealed_and_matched() {
    let mut game = MemoryGame::without_preview(interleaved_deck());
    flip(&mut game, 0);
    flip(&mut game, 2);
    flip(&mut game, 7);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase(), GamePhase::Active);
    assert_eq!(snapshot.revealed(), &[7]);
    assert_eq!(snapshot.matched(), &[0, 2]);
    assert!(snapshot.is_face_up(0));
    assert!(snapshot.is_face_up(7));
    assert!(!snapshot.is_face_up(1));
}

#[test]
fn test_snapshot_is_detached_from_game() {
    let mut game = MemoryGame::without_preview(interleaved_deck());
    let before = game.snapshot();
    flip(&mut game, 0);
    assert!(before.revealed().is_empty());
    assert_eq!(game.snapshot().revealed(), &[0]);
}

#[test]
fn test_snapshot_serializes() {
    let mut game = MemoryGame::without_preview(interleaved_deck());
    flip(&mut game, 1);
    let json = serde_json::to_value(game.snapshot()).expect("serialize");
    assert_eq!(json["phase"], "Active");
    assert_eq!(json["revealed"][0], 1);
}

#[test]
fn test_invariant_violation_display() {
    let err = EngineError::InvariantViolation("3 cards flipped".to_string());
    assert_eq!(err.to_string(), "Invariant violation: 3 cards flipped");
}
