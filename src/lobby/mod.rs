//! Lobby system: the multi-screen terminal UI.

mod controller;
mod screen;
mod screens;

pub use controller::LobbyController;
pub use screen::{Screen, ScreenTransition};
pub use screens::{BestScoresScreen, InGameScreen, MainMenuScreen, NameInputScreen};
