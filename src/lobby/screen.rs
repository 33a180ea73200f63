//! Screen trait and transition type for the lobby state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::SessionController;

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`LobbyController`](crate::LobbyController) state machine. Transitions
/// carry whatever the next screen needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Navigate to the main menu.
    GoToMainMenu,
    /// Navigate to the player name prompt.
    GoToNameInput {
        /// Name pre-filled in the input field.
        default_name: String,
    },
    /// Start a game session for the named player.
    GoToGame {
        /// Validated, non-blank player name.
        player_name: String,
    },
    /// Navigate to the best-scores table.
    GoToBestScores,
    /// Exit the application cleanly.
    Quit,
}

/// Trait implemented by each screen in the lobby state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
/// The controller calls these methods in the event loop.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent, session: &SessionController) -> ScreenTransition;
}
