//! In-game screen: counters, the card grid and the end-of-game overlay.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use memory_engine::{BoardSnapshot, Counters, Deck, GRID_COLUMNS, GamePhase, Symbol};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{SessionController, SessionEvent, SessionEventKind, SessionId};

/// How the score of a finished game was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScoreStatus {
    Pending,
    Saved,
    StorageFailed(String),
    Rejected(String),
}

/// State for the in-game screen.
///
/// Everything drawn comes from [`SessionEvent`]s; the screen never reads the
/// engine directly.
#[derive(Debug, Getters)]
pub struct InGameScreen {
    player_name: String,
    session_id: SessionId,
    deck: Deck,
    board: BoardSnapshot,
    counters: Counters,
    cursor: usize,
    game_over: Option<Counters>,
    #[getter(skip)]
    score_status: ScoreStatus,
}

impl InGameScreen {
    /// Creates the game screen for a freshly started session.
    #[instrument(skip(deck, board))]
    pub fn new(player_name: String, session_id: SessionId, deck: Deck, board: BoardSnapshot) -> Self {
        debug!(session = session_id, "Initializing InGameScreen");
        let counters = board.counters();
        Self {
            player_name,
            session_id,
            deck,
            board,
            counters,
            cursor: 0,
            game_over: None,
            score_status: ScoreStatus::Pending,
        }
    }

    /// Applies an event from the session controller.
    ///
    /// Events from other sessions are dropped.
    #[instrument(skip(self, event), fields(session = self.session_id))]
    pub fn apply_event(&mut self, event: SessionEvent) {
        if *event.session() != self.session_id {
            debug!(stale = event.session(), "Dropping event from another session");
            return;
        }
        match event.into_kind() {
            SessionEventKind::CountersChanged(counters) => self.counters = counters,
            SessionEventKind::BoardChanged(board) => {
                self.counters = board.counters();
                self.board = board;
            }
            SessionEventKind::GameOver(counters) => {
                info!(?counters, "Game over");
                self.counters = counters;
                self.game_over = Some(counters);
            }
            SessionEventKind::ScoreRecorded(_) => self.score_status = ScoreStatus::Saved,
            SessionEventKind::ScoreNotRecorded { kind, reason } => {
                warn!(%kind, reason = %reason, "Score was not saved");
                self.score_status = if kind.is_storage_failure() {
                    ScoreStatus::StorageFailed(reason)
                } else {
                    ScoreStatus::Rejected(reason)
                };
            }
        }
    }

    /// Returns true once the score store has refused or failed to save
    /// the finished game.
    pub fn score_lost(&self) -> bool {
        matches!(
            self.score_status,
            ScoreStatus::StorageFailed(_) | ScoreStatus::Rejected(_)
        )
    }

    /// Moves the cursor by whole rows or columns, staying on the board.
    #[instrument(skip(self))]
    fn move_cursor(&mut self, rows: isize, cols: isize) {
        let rows_total = (self.deck.len() / GRID_COLUMNS) as isize;
        let row = (self.cursor / GRID_COLUMNS) as isize + rows;
        let col = (self.cursor % GRID_COLUMNS) as isize + cols;
        if (0..rows_total).contains(&row) && (0..GRID_COLUMNS as isize).contains(&col) {
            self.cursor = (row as usize) * GRID_COLUMNS + col as usize;
        }
    }

    fn card_cell(&self, index: usize) -> Span<'static> {
        let selected = index == self.cursor && self.game_over.is_none();
        let base = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        if !self.board.is_face_up(index) {
            return Span::styled(" ?? ", base.fg(Color::White));
        }
        let Some(symbol) = self.deck.symbol_at(index) else {
            return Span::styled("    ", base);
        };
        let style = if self.board.matched().contains(&index) {
            base.fg(symbol_color(symbol))
        } else {
            base.fg(symbol_color(symbol)).add_modifier(Modifier::BOLD)
        };
        let style = if symbol == Symbol::Black {
            style.bg(Color::Gray)
        } else {
            style
        };
        Span::styled(" ██ ", style)
    }

    fn render_overlay(&self, frame: &mut Frame, area: Rect, counters: Counters) {
        let popup = centered(area, 50, 9);
        let saved = match &self.score_status {
            ScoreStatus::Pending => "Saving score…".to_string(),
            ScoreStatus::Saved => "Score saved.".to_string(),
            ScoreStatus::StorageFailed(reason) => format!("Score not saved: {}", reason),
            ScoreStatus::Rejected(reason) => format!("Score not accepted: {}", reason),
        };
        let text = vec![
            Line::from(format!(
                "Finished in {} moves, {} seconds, {} errors",
                counters.moves, counters.elapsed_seconds, counters.errors
            )),
            Line::from(""),
            Line::from(saved),
            Line::from(""),
            Line::from("r: Restart | Esc: Exit to menu"),
        ];
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Game Over"));
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

impl Screen for InGameScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(format!("Memory Match - {}", self.player_name))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let counters = Paragraph::new(format!(
            "Moves: {}   Time: {}s   Errors: {}",
            self.counters.moves, self.counters.elapsed_seconds, self.counters.errors
        ))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(counters, chunks[1]);

        let mut lines = Vec::new();
        for row in self.deck.cards().chunks(GRID_COLUMNS) {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|card| [self.card_cell(card.position()), Span::raw(" ")])
                .collect();
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }
        let board_title = match self.board.phase() {
            GamePhase::Preview => "Memorize the board!",
            _ => "Board",
        };
        let board = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(board_title));
        frame.render_widget(board, chunks[2]);

        let help = Paragraph::new("←↑↓→: Move | Enter/Space: Flip | Esc: Menu | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);

        if let Some(final_counters) = self.game_over {
            self.render_overlay(frame, area, final_counters);
        }
    }

    #[instrument(skip(self, key, session))]
    fn handle_key(&mut self, key: KeyEvent, session: &SessionController) -> ScreenTransition {
        if self.game_over.is_some() {
            return match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    info!("Restart requested");
                    ScreenTransition::GoToNameInput {
                        default_name: self.player_name.clone(),
                    }
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
                KeyCode::Esc | KeyCode::Char('e') | KeyCode::Char('E') => {
                    ScreenTransition::GoToMainMenu
                }
                _ => ScreenTransition::Stay,
            };
        }

        match key.code {
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Err(e) = session.request_flip(self.cursor) {
                    warn!(error = %e, index = self.cursor, "Flip request failed");
                }
            }
            KeyCode::Esc => {
                info!("Leaving game for menu");
                return ScreenTransition::GoToMainMenu;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return ScreenTransition::Quit,
            _ => {}
        }
        ScreenTransition::Stay
    }
}

/// Terminal colour for a card face.
fn symbol_color(symbol: Symbol) -> Color {
    match symbol {
        Symbol::Red => Color::Red,
        Symbol::Green => Color::Green,
        Symbol::Blue => Color::Blue,
        Symbol::Yellow => Color::Yellow,
        Symbol::Magenta => Color::Magenta,
        Symbol::Cyan => Color::Cyan,
        Symbol::Gray => Color::Gray,
        Symbol::Black => Color::Black,
    }
}

/// A `width`% wide, `height` rows tall rectangle centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width) / 2),
            Constraint::Percentage(width),
            Constraint::Percentage((100 - width) / 2),
        ])
        .split(vertical[1])[1]
}
