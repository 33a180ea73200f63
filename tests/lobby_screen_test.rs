//! Tests for lobby screens: key handling, transitions and event filtering.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tempfile::NamedTempFile;

use memory_match::{
    BestScoresScreen, Counters, DbError, DbErrorKind, Deck, InGameScreen, MainMenuScreen, MemoryGame,
    NameInputScreen, NewScore, Score, ScoreRepository, ScoreStore, Screen, ScreenTransition,
    SessionController, SessionEvent, SessionEventKind, SessionTimings, Symbol,
};

#[derive(Debug)]
struct FailingStore;

impl ScoreStore for FailingStore {
    fn insert(&self, _score: NewScore) -> Result<Score, DbError> {
        Err(DbError::new(DbErrorKind::Query, "unavailable"))
    }

    fn top_scores(&self, _limit: usize) -> Result<Vec<Score>, DbError> {
        Err(DbError::new(DbErrorKind::Query, "unavailable"))
    }
}

fn offline_controller() -> SessionController {
    SessionController::new(Arc::new(FailingStore), SessionTimings::default()).0
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(screen: &mut dyn Screen, session: &SessionController, code: KeyCode) -> ScreenTransition {
    screen.handle_key(key(code), session)
}

fn ordered_deck() -> Deck {
    use Symbol::*;
    Deck::from_symbols(&[
        Red, Red, Green, Green, Blue, Blue, Yellow, Yellow, Magenta, Magenta, Cyan, Cyan, Gray,
        Gray, Black, Black,
    ])
    .expect("valid layout")
}

fn game_screen(session_id: u64) -> InGameScreen {
    let deck = ordered_deck();
    let board = MemoryGame::new(deck.clone()).snapshot();
    InGameScreen::new("Ana".to_string(), session_id, deck, board)
}

fn finished_counters() -> Counters {
    Counters {
        moves: 9,
        errors: 1,
        elapsed_seconds: 31,
    }
}

#[test]
fn test_main_menu_start_game_prefills_last_name() {
    let session = offline_controller();
    let mut menu = MainMenuScreen::new("Ana".to_string());
    assert_eq!(
        press(&mut menu, &session, KeyCode::Enter),
        ScreenTransition::GoToNameInput {
            default_name: "Ana".to_string()
        }
    );
}

#[test]
fn test_main_menu_navigation() {
    let session = offline_controller();
    let mut menu = MainMenuScreen::new(String::new());

    assert_eq!(press(&mut menu, &session, KeyCode::Down), ScreenTransition::Stay);
    assert_eq!(
        press(&mut menu, &session, KeyCode::Enter),
        ScreenTransition::GoToBestScores
    );

    press(&mut menu, &session, KeyCode::Down);
    assert_eq!(press(&mut menu, &session, KeyCode::Enter), ScreenTransition::Quit);

    // Wraps around to the top.
    press(&mut menu, &session, KeyCode::Down);
    assert!(matches!(
        press(&mut menu, &session, KeyCode::Enter),
        ScreenTransition::GoToNameInput { .. }
    ));
}

#[test]
fn test_main_menu_escape_quits() {
    let session = offline_controller();
    let mut menu = MainMenuScreen::new(String::new());
    assert_eq!(press(&mut menu, &session, KeyCode::Esc), ScreenTransition::Quit);
}

#[test]
fn test_name_input_rejects_blank_name() {
    let session = offline_controller();
    let mut input = NameInputScreen::new(String::new());

    press(&mut input, &session, KeyCode::Char(' '));
    assert_eq!(press(&mut input, &session, KeyCode::Enter), ScreenTransition::Stay);
    assert_eq!(
        input.error_message().as_deref(),
        Some("Name cannot be empty")
    );
}

#[test]
fn test_name_input_confirms_trimmed_name() {
    let session = offline_controller();
    let mut input = NameInputScreen::new(String::new());

    for c in " Ana ".chars() {
        press(&mut input, &session, KeyCode::Char(c));
    }
    assert_eq!(
        press(&mut input, &session, KeyCode::Enter),
        ScreenTransition::GoToGame {
            player_name: "Ana".to_string()
        }
    );
}

#[test]
fn test_name_input_editing() {
    let session = offline_controller();
    let mut input = NameInputScreen::new("Anna".to_string()).with_error("taken".to_string());

    press(&mut input, &session, KeyCode::Backspace);
    assert_eq!(input.name_input(), "Ann");
    press(&mut input, &session, KeyCode::Char('e'));
    assert_eq!(input.name_input(), "Anne");
    assert!(input.error_message().is_none());

    assert_eq!(
        press(&mut input, &session, KeyCode::Esc),
        ScreenTransition::GoToMainMenu
    );
}

#[test]
fn test_in_game_cursor_stays_on_board() {
    let session = offline_controller();
    let mut screen = game_screen(1);

    press(&mut screen, &session, KeyCode::Up);
    press(&mut screen, &session, KeyCode::Left);
    assert_eq!(*screen.cursor(), 0);

    press(&mut screen, &session, KeyCode::Right);
    press(&mut screen, &session, KeyCode::Down);
    assert_eq!(*screen.cursor(), 5);

    for _ in 0..5 {
        press(&mut screen, &session, KeyCode::Down);
        press(&mut screen, &session, KeyCode::Right);
    }
    assert_eq!(*screen.cursor(), 15);
}

#[test]
fn test_in_game_flip_without_session_stays() {
    let session = offline_controller();
    let mut screen = game_screen(1);
    assert_eq!(press(&mut screen, &session, KeyCode::Enter), ScreenTransition::Stay);
}

#[test]
fn test_in_game_escape_returns_to_menu() {
    let session = offline_controller();
    let mut screen = game_screen(1);
    assert_eq!(
        press(&mut screen, &session, KeyCode::Esc),
        ScreenTransition::GoToMainMenu
    );
}

#[test]
fn test_in_game_drops_events_from_other_sessions() {
    let mut screen = game_screen(2);
    let counters = Counters {
        moves: 3,
        errors: 2,
        elapsed_seconds: 7,
    };

    screen.apply_event(SessionEvent::new(1, SessionEventKind::CountersChanged(counters)));
    assert_eq!(*screen.counters(), Counters::default());

    screen.apply_event(SessionEvent::new(2, SessionEventKind::CountersChanged(counters)));
    assert_eq!(*screen.counters(), counters);
}

#[test]
fn test_in_game_board_event_replaces_snapshot() {
    let mut screen = game_screen(1);
    let mut game = MemoryGame::without_preview(ordered_deck());
    game.request_flip(0).expect("invariants hold");
    game.request_flip(1).expect("invariants hold");

    screen.apply_event(SessionEvent::new(1, SessionEventKind::BoardChanged(game.snapshot())));
    assert_eq!(screen.board().matched(), &[0, 1]);
    assert_eq!(screen.counters().moves, 1);
}

#[test]
fn test_game_over_overlay_offers_restart_and_exit() {
    let session = offline_controller();
    let mut screen = game_screen(1);
    screen.apply_event(SessionEvent::new(
        1,
        SessionEventKind::GameOver(finished_counters()),
    ));
    assert_eq!(*screen.game_over(), Some(finished_counters()));

    // Board keys do nothing under the overlay.
    assert_eq!(press(&mut screen, &session, KeyCode::Right), ScreenTransition::Stay);
    assert_eq!(*screen.cursor(), 0);

    assert_eq!(
        press(&mut screen, &session, KeyCode::Char('r')),
        ScreenTransition::GoToNameInput {
            default_name: "Ana".to_string()
        }
    );
    assert_eq!(
        press(&mut screen, &session, KeyCode::Char('e')),
        ScreenTransition::GoToMainMenu
    );
}

#[test]
fn test_in_game_renders_every_phase() {
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
    let mut screen = game_screen(1);
    terminal.draw(|f| screen.render(f)).expect("draw preview");

    screen.apply_event(SessionEvent::new(
        1,
        SessionEventKind::GameOver(finished_counters()),
    ));
    screen.apply_event(SessionEvent::new(
        1,
        SessionEventKind::ScoreNotRecorded {
            kind: DbErrorKind::Query,
            reason: "unavailable".to_string(),
        },
    ));
    terminal.draw(|f| screen.render(f)).expect("draw overlay");
}

#[test]
fn test_in_game_tracks_lost_scores() {
    let mut screen = game_screen(1);
    assert!(!screen.score_lost());

    screen.apply_event(SessionEvent::new(
        1,
        SessionEventKind::ScoreNotRecorded {
            kind: DbErrorKind::InvalidRecord,
            reason: "Player name cannot be blank".to_string(),
        },
    ));
    assert!(screen.score_lost());

    let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
    screen.apply_event(SessionEvent::new(
        1,
        SessionEventKind::GameOver(finished_counters()),
    ));
    terminal.draw(|f| screen.render(f)).expect("draw overlay");
}

#[test]
fn test_best_scores_shows_load_error() {
    let session = offline_controller();
    let mut screen = BestScoresScreen::new(&session, 10);

    assert!(screen.scores().is_empty());
    assert!(
        screen
            .error_message()
            .as_deref()
            .is_some_and(|m| m.contains("unavailable"))
    );
    assert_eq!(
        press(&mut screen, &session, KeyCode::Char('b')),
        ScreenTransition::GoToMainMenu
    );
}

#[test]
fn test_best_scores_loads_ranked_rows() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = ScoreRepository::open(db_path).expect("Open failed");
    for (name, moves) in [("Slow", 14), ("Fast", 8), ("Mid", 10)] {
        repo.record_score(NewScore::new(name.to_string(), moves, 30, 0))
            .expect("Insert failed");
    }
    let (session, _events) = SessionController::new(Arc::new(repo), SessionTimings::default());

    let screen = BestScoresScreen::new(&session, 2);
    let names: Vec<&str> = screen
        .scores()
        .iter()
        .map(|s| s.player_name().as_str())
        .collect();
    assert_eq!(names, vec!["Fast", "Mid"]);
    assert!(screen.error_message().is_none());
    assert_eq!(*screen.limit(), 2);

    let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
    terminal.draw(|f| screen.render(f)).expect("draw table");
}
