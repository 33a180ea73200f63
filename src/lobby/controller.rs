//! Lobby controller: the state machine driving the multi-screen TUI.

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::lobby::screens::{BestScoresScreen, InGameScreen, MainMenuScreen, NameInputScreen};
use crate::{SessionController, SessionEvent};

/// Active screen in the lobby state machine.
#[derive(Debug)]
enum ActiveScreen {
    MainMenu(MainMenuScreen),
    NameInput(NameInputScreen),
    InGame(InGameScreen),
    BestScores(BestScoresScreen),
}

impl ActiveScreen {
    fn as_screen(&self) -> &dyn Screen {
        match self {
            Self::MainMenu(s) => s,
            Self::NameInput(s) => s,
            Self::InGame(s) => s,
            Self::BestScores(s) => s,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::MainMenu(s) => s,
            Self::NameInput(s) => s,
            Self::InGame(s) => s,
            Self::BestScores(s) => s,
        }
    }
}

/// Controller that drives the lobby state machine.
///
/// Call [`LobbyController::run`] to start the event loop.
#[derive(Debug)]
pub struct LobbyController {
    session: SessionController,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    top_scores_limit: usize,
    last_player_name: String,
}

impl LobbyController {
    /// Creates a new lobby controller.
    #[instrument(skip(session, events))]
    pub fn new(
        session: SessionController,
        events: mpsc::UnboundedReceiver<SessionEvent>,
        top_scores_limit: usize,
    ) -> Self {
        info!("Creating LobbyController");
        Self {
            session,
            events,
            top_scores_limit,
            last_player_name: String::new(),
        }
    }

    /// Runs the lobby event loop until the user quits.
    ///
    /// Drives screen transitions and forwards session events to the game
    /// screen. Terminal setup and teardown are the caller's job.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting lobby event loop");

        let mut screen = ActiveScreen::MainMenu(MainMenuScreen::new(self.last_player_name.clone()));

        loop {
            self.drain_session_events(&mut screen);

            terminal.draw(|f| screen.as_screen().render(f))?;

            // Poll for input with short timeout to keep the loop responsive.
            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let transition = screen.as_screen_mut().handle_key(key, &self.session);
                screen = match self.apply_transition(transition, screen) {
                    Some(next) => next,
                    None => {
                        self.session.abandon_session();
                        info!("Lobby quitting");
                        return Ok(());
                    }
                };
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Forwards pending session events to the game screen.
    fn drain_session_events(&mut self, screen: &mut ActiveScreen) {
        while let Ok(event) = self.events.try_recv() {
            match screen {
                ActiveScreen::InGame(s) => s.apply_event(event),
                _ => debug!(event = ?event.kind(), "Session event with no game screen"),
            }
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    #[instrument(skip(self, current))]
    fn apply_transition(
        &mut self,
        transition: ScreenTransition,
        current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        debug!(transition = ?transition, "Applying screen transition");

        if matches!(current, ActiveScreen::InGame(_))
            && !matches!(transition, ScreenTransition::Stay)
            && let Some(id) = self.session.abandon_session()
        {
            debug!(session = id, "Game screen closed, session discarded");
        }

        match transition {
            ScreenTransition::Stay => Some(current),

            ScreenTransition::GoToMainMenu => {
                info!("Navigating to MainMenu");
                Some(ActiveScreen::MainMenu(MainMenuScreen::new(
                    self.last_player_name.clone(),
                )))
            }

            ScreenTransition::GoToNameInput { default_name } => {
                info!("Navigating to NameInput");
                Some(ActiveScreen::NameInput(NameInputScreen::new(default_name)))
            }

            ScreenTransition::GoToGame { player_name } => {
                info!(player_name = %player_name, "Navigating to InGame");
                Some(self.start_game(player_name))
            }

            ScreenTransition::GoToBestScores => {
                info!("Navigating to BestScores");
                Some(ActiveScreen::BestScores(BestScoresScreen::new(
                    &self.session,
                    self.top_scores_limit,
                )))
            }

            ScreenTransition::Quit => None,
        }
    }

    /// Starts a session and builds its game screen, falling back to the
    /// name prompt if the session cannot start.
    #[instrument(skip(self))]
    fn start_game(&mut self, player_name: String) -> ActiveScreen {
        let started = self.session.start_session(&player_name).and_then(|id| {
            match (self.session.deck(), self.session.snapshot()) {
                (Some(deck), Some(board)) => Ok((id, deck, board)),
                _ => Err(crate::SessionError::NoActiveSession),
            }
        });

        match started {
            Ok((id, deck, board)) => {
                self.last_player_name = player_name.clone();
                // Drop events from earlier sessions; the snapshot is current.
                while self.events.try_recv().is_ok() {}
                ActiveScreen::InGame(InGameScreen::new(player_name, id, deck, board))
            }
            Err(e) => {
                warn!(error = %e, "Could not start session");
                ActiveScreen::NameInput(
                    NameInputScreen::new(player_name).with_error(e.to_string()),
                )
            }
        }
    }
}
