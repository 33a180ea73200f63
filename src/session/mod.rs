//! Game session management: one active memory game at a time.

mod controller;
mod events;
mod timers;

pub use controller::SessionController;
pub use events::{SessionEvent, SessionEventKind, SessionId};

use memory_engine::EngineError;

/// Error returned by [`SessionController`] commands.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The player name is empty or whitespace.
    #[display("Player name cannot be blank")]
    BlankPlayerName,

    /// A flip was requested with no session running.
    #[display("No active session")]
    NoActiveSession,

    /// Sessions need a tokio runtime for their timers.
    #[display("Session timers require a tokio runtime")]
    NoRuntime,

    /// The engine detected corrupt state.
    #[display("Engine failure: {}", _0)]
    Engine(EngineError),
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }
}
