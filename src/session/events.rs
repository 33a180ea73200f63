//! Events emitted by the session controller to the presentation layer.

use derive_getters::Getters;
use memory_engine::{BoardSnapshot, Counters};

use crate::{DbErrorKind, Score};

/// Identifier of one game session, unique within a controller.
pub type SessionId = u64;

/// What changed in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEventKind {
    /// Moves, time or errors changed.
    CountersChanged(Counters),
    /// Face-up or matched cards changed.
    BoardChanged(BoardSnapshot),
    /// The last pair was matched; carries the final counters.
    GameOver(Counters),
    /// The finished session's score was stored.
    ScoreRecorded(Score),
    /// The finished session's score could not be stored.
    ///
    /// [`DbErrorKind::is_storage_failure`] tells a failing store apart from
    /// a record the store refused.
    ScoreNotRecorded {
        /// Why the store gave up.
        kind: DbErrorKind,
        /// Error message.
        reason: String,
    },
}

/// An event tagged with the session it belongs to.
///
/// Consumers drop events whose session is no longer the one on screen.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SessionEvent {
    session: SessionId,
    kind: SessionEventKind,
}

impl SessionEvent {
    /// Creates a new event.
    pub fn new(session: SessionId, kind: SessionEventKind) -> Self {
        Self { session, kind }
    }

    /// Consumes the event, returning its payload.
    pub fn into_kind(self) -> SessionEventKind {
        self.kind
    }
}
