//! Best scores screen: the top of the high-score table.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{Score, SessionController};

/// State for the best scores screen.
#[derive(Debug, Getters)]
pub struct BestScoresScreen {
    scores: Vec<Score>,
    limit: usize,
    error_message: Option<String>,
}

impl BestScoresScreen {
    /// Creates the screen, loading the top `limit` scores immediately.
    #[instrument(skip(session))]
    pub fn new(session: &SessionController, limit: usize) -> Self {
        let (scores, error_message) = match session.query_top_scores(limit) {
            Ok(scores) => (scores, None),
            Err(e) => {
                warn!(error = %e, "Failed to load best scores");
                (Vec::new(), Some(format!("Could not load scores: {}", e.message)))
            }
        };
        info!(count = scores.len(), "BestScoresScreen initialized");
        Self {
            scores,
            limit,
            error_message,
        }
    }
}

impl Screen for BestScoresScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Best Scores")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        if let Some(message) = &self.error_message {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(error, chunks[1]);
        } else if self.scores.is_empty() {
            let empty = Paragraph::new("No scores yet. Finish a game to get on the board!")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[1]);
        } else {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            let header = Row::new(vec![
                Cell::from("#").style(bold),
                Cell::from("Player").style(bold),
                Cell::from("Moves").style(bold),
                Cell::from("Time").style(bold),
                Cell::from("Errors").style(bold),
            ])
            .style(Style::default().fg(Color::Yellow));

            let rows: Vec<Row> = self
                .scores
                .iter()
                .enumerate()
                .map(|(rank, score)| {
                    Row::new(vec![
                        Cell::from((rank + 1).to_string()),
                        Cell::from(score.player_name().as_str()),
                        Cell::from(score.moves().to_string()),
                        Cell::from(format!("{}s", score.time())),
                        Cell::from(score.errors().to_string()),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Percentage(40),
                Constraint::Percentage(18),
                Constraint::Percentage(18),
                Constraint::Percentage(18),
            ];

            let table = Table::new(rows, widths).header(header).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Top {}", self.limit)),
            );
            frame.render_widget(table, chunks[1]);
        }

        let help = Paragraph::new("Esc / b: Back to Menu | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key, _session))]
    fn handle_key(&mut self, key: KeyEvent, _session: &SessionController) -> ScreenTransition {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                info!("Returning to main menu from best scores");
                ScreenTransition::GoToMainMenu
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
