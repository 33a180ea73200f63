//! Screen implementations for the lobby state machine.

mod best_scores;
mod in_game;
mod main_menu;
mod name_input;

pub use best_scores::BestScoresScreen;
pub use in_game::InGameScreen;
pub use main_menu::MainMenuScreen;
pub use name_input::NameInputScreen;
