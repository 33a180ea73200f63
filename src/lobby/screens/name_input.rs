//! Name input screen: asks for the player name before a game.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::SessionController;
use crate::lobby::screen::{Screen, ScreenTransition};

/// State for the name input screen.
#[derive(Debug, Getters)]
pub struct NameInputScreen {
    name_input: String,
    error_message: Option<String>,
}

impl NameInputScreen {
    /// Creates the prompt, pre-filled with `default_name`.
    #[instrument]
    pub fn new(default_name: String) -> Self {
        debug!("Initializing NameInputScreen");
        Self {
            name_input: default_name,
            error_message: None,
        }
    }

    /// Shows an error below the input field.
    #[instrument(skip(self))]
    pub fn with_error(mut self, message: String) -> Self {
        self.error_message = Some(message);
        self
    }

    /// Validates the input and returns the trimmed name.
    #[instrument(skip(self))]
    fn confirm(&mut self) -> Option<String> {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            self.error_message = Some("Name cannot be empty".to_string());
            return None;
        }
        info!(player_name = %name, "Player name confirmed");
        Some(name)
    }
}

impl Screen for NameInputScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Enter Your Name")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let input = Paragraph::new(self.name_input.as_str())
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).title("Player Name"));
        frame.render_widget(input, chunks[1]);

        let error_text = self.error_message.as_deref().unwrap_or("");
        let error = Paragraph::new(error_text)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[2]);

        let help = Paragraph::new("Type name | Enter: Confirm | Esc: Cancel")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, _session))]
    fn handle_key(&mut self, key: KeyEvent, _session: &SessionController) -> ScreenTransition {
        match key.code {
            KeyCode::Enter => match self.confirm() {
                Some(player_name) => ScreenTransition::GoToGame { player_name },
                None => ScreenTransition::Stay,
            },
            KeyCode::Esc => {
                info!("Name input cancelled");
                ScreenTransition::GoToMainMenu
            }
            KeyCode::Backspace => {
                self.name_input.pop();
                ScreenTransition::Stay
            }
            KeyCode::Char(c) => {
                self.name_input.push(c);
                self.error_message = None;
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }
}
