//! Session controller: wires flip requests, timers and score persistence.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use memory_engine::{BoardSnapshot, Counters, Deck, FlipOutcome, MemoryGame};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::session::timers::SessionTimers;
use crate::session::{SessionError, SessionEvent, SessionEventKind, SessionId};
use crate::{DbError, NewScore, Score, ScoreStore, SessionTimings};

/// The session currently being played.
#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    player_name: String,
    game: MemoryGame,
    timers: SessionTimers,
}

/// State shared between the controller and its timer callbacks.
///
/// Callbacks hold a [`Weak`](std::sync::Weak) reference and check the session id before
/// touching anything, so a callback that fires after its session was
/// replaced does nothing.
#[derive(Debug)]
struct Shared {
    store: Arc<dyn ScoreStore>,
    timings: SessionTimings,
    events: mpsc::UnboundedSender<SessionEvent>,
    active: Mutex<Option<ActiveSession>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends an event. State-change events are sent with the session lock
    /// held so they leave in the order the changes happened.
    fn emit(&self, session: SessionId, kind: SessionEventKind) {
        if self.events.send(SessionEvent::new(session, kind)).is_err() {
            debug!(session, "Event receiver dropped");
        }
    }

    /// Runs `f` on the active session if it is still `id`.
    fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&mut ActiveSession) -> R) -> Option<R> {
        let mut guard = self.lock();
        match guard.as_mut() {
            Some(session) if session.id == id => Some(f(session)),
            _ => {
                debug!(session = id, "Timer fired for a stale session");
                None
            }
        }
    }

    #[instrument(skip(self))]
    fn end_preview(&self, id: SessionId) {
        self.with_session(id, |session| {
            if session.game.end_preview() {
                info!(session = id, "Preview over, waiting for first flip");
                self.emit(id, SessionEventKind::BoardChanged(session.game.snapshot()));
            }
        });
    }

    #[instrument(skip(self))]
    fn clear_mismatch(&self, id: SessionId) {
        self.with_session(id, |session| {
            if session.game.clear_mismatch() {
                self.emit(id, SessionEventKind::BoardChanged(session.game.snapshot()));
            }
        });
    }

    fn tick(&self, id: SessionId) -> ControlFlow<()> {
        self.with_session(id, |session| {
            if session.game.tick() {
                self.emit(id, SessionEventKind::CountersChanged(session.game.counters()));
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
        .unwrap_or(ControlFlow::Break(()))
    }

    /// Persists a finished session's score. Failure is logged and reported
    /// as an event; it never affects the game.
    #[instrument(skip(self, player_name), fields(player_name = %player_name))]
    fn record_score(&self, id: SessionId, player_name: &str, counters: Counters) {
        let result = NewScore::from_counters(player_name, counters)
            .and_then(|score| self.store.insert(score));

        match result {
            Ok(score) => {
                info!(session = id, score_id = score.id(), "Score persisted");
                self.emit(id, SessionEventKind::ScoreRecorded(score));
            }
            Err(e) => {
                if e.kind.is_storage_failure() {
                    warn!(session = id, error = %e, "Failed to persist score");
                } else {
                    info!(session = id, error = %e, "Score record rejected");
                }
                self.emit(
                    id,
                    SessionEventKind::ScoreNotRecorded {
                        kind: e.kind,
                        reason: e.message,
                    },
                );
            }
        }
    }
}

/// Drives one game session at a time for the presentation layer.
///
/// Commands come in through [`start_session`](Self::start_session),
/// [`request_flip`](Self::request_flip),
/// [`abandon_session`](Self::abandon_session) and
/// [`query_top_scores`](Self::query_top_scores); state changes go out as
/// [`SessionEvent`]s on the channel returned by [`SessionController::new`].
///
/// Timers are tokio tasks, so sessions must be started from within a
/// tokio runtime.
#[derive(Debug)]
pub struct SessionController {
    shared: Arc<Shared>,
    next_id: AtomicU64,
}

impl SessionController {
    /// Creates a controller and the receiver for its events.
    #[instrument(skip(store))]
    pub fn new(
        store: Arc<dyn ScoreStore>,
        timings: SessionTimings,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        info!("Creating SessionController");
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            shared: Arc::new(Shared {
                store,
                timings,
                events,
                active: Mutex::new(None),
            }),
            next_id: AtomicU64::new(1),
        };
        (controller, receiver)
    }

    /// Starts a new session with a freshly shuffled deck.
    ///
    /// Any session in progress is abandoned first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BlankPlayerName`] for a blank name and
    /// [`SessionError::NoRuntime`] outside a tokio runtime.
    #[instrument(skip(self))]
    pub fn start_session(&self, player_name: &str) -> Result<SessionId, SessionError> {
        self.start_session_with_deck(player_name, Deck::generate())
    }

    /// Starts a new session with the given deck.
    ///
    /// # Errors
    ///
    /// See [`SessionController::start_session`].
    #[instrument(skip(self, deck))]
    pub fn start_session_with_deck(
        &self,
        player_name: &str,
        deck: Deck,
    ) -> Result<SessionId, SessionError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            warn!("Rejected blank player name");
            return Err(SessionError::BlankPlayerName);
        }
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let game = MemoryGame::new(deck);
        let snapshot = game.snapshot();

        // Held from before the preview timer is armed, so the timer cannot
        // fire before the session is installed.
        let mut guard = self.shared.lock();
        let mut timers = SessionTimers::new(runtime);
        let weak = Arc::downgrade(&self.shared);
        timers.schedule_preview_end(*self.shared.timings.preview(), move || {
            if let Some(shared) = weak.upgrade() {
                shared.end_preview(id);
            }
        });

        let previous = guard.replace(ActiveSession {
            id,
            player_name: player_name.to_string(),
            game,
            timers,
        });
        info!(session = id, player_name = %player_name, "Session started");
        self.shared
            .emit(id, SessionEventKind::CountersChanged(snapshot.counters()));
        self.shared.emit(id, SessionEventKind::BoardChanged(snapshot));
        drop(guard);

        if let Some(previous) = previous {
            info!(session = previous.id, "Previous session abandoned");
        }
        Ok(id)
    }

    /// Flips a card in the active session.
    ///
    /// Rejected flips are returned as [`FlipOutcome::Ignored`] and change
    /// nothing. When the flip completes the board, the score is persisted
    /// before the [`SessionEventKind::GameOver`] event is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveSession`] if no session is running,
    /// or [`SessionError::Engine`] if the engine detected corrupt state.
    #[instrument(skip(self))]
    pub fn request_flip(&self, index: usize) -> Result<FlipOutcome, SessionError> {
        let mut guard = self.shared.lock();
        let session = guard.as_mut().ok_or(SessionError::NoActiveSession)?;
        let id = session.id;

        let outcome = session.game.request_flip(index).map_err(|e| {
            error!(session = id, error = %e, "Engine state corrupt");
            SessionError::Engine(e)
        })?;
        if !outcome.is_accepted() {
            return Ok(outcome);
        }

        let snapshot = session.game.snapshot();
        let timings = self.shared.timings;

        if session.game.phase().is_started() && !session.game.is_finished() {
            let weak = Arc::downgrade(&self.shared);
            session.timers.start_ticker(*timings.tick(), move || match weak.upgrade() {
                Some(shared) => shared.tick(id),
                None => ControlFlow::Break(()),
            });
        }

        let mut completed = None;
        match outcome {
            FlipOutcome::Mismatched { .. } => {
                let weak = Arc::downgrade(&self.shared);
                session
                    .timers
                    .schedule_mismatch_clear(*timings.mismatch_delay(), move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.clear_mismatch(id);
                        }
                    });
            }
            FlipOutcome::Completed(counters) => {
                session.timers.stop_ticker();
                completed = Some((session.player_name.clone(), counters));
            }
            _ => {}
        }

        if outcome.is_attempt() {
            self.shared
                .emit(id, SessionEventKind::CountersChanged(snapshot.counters()));
        }
        self.shared.emit(id, SessionEventKind::BoardChanged(snapshot));
        drop(guard);

        if let Some((player_name, counters)) = completed {
            info!(session = id, ?counters, "Session finished");
            self.shared.record_score(id, &player_name, counters);
            self.shared.emit(id, SessionEventKind::GameOver(counters));
        }

        Ok(outcome)
    }

    /// Discards the active session and cancels its timers.
    ///
    /// Returns the id of the abandoned session, if there was one.
    #[instrument(skip(self))]
    pub fn abandon_session(&self) -> Option<SessionId> {
        let abandoned = self.shared.lock().take();
        abandoned.map(|session| {
            info!(session = session.id, "Session abandoned");
            session.id
        })
    }

    /// Returns the best stored scores.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be read.
    #[instrument(skip(self))]
    pub fn query_top_scores(&self, limit: usize) -> Result<Vec<Score>, DbError> {
        self.shared.store.top_scores(limit)
    }

    /// Returns the id of the active session.
    pub fn active_session(&self) -> Option<SessionId> {
        self.shared.lock().as_ref().map(|s| s.id)
    }

    /// Returns a snapshot of the active session's board.
    pub fn snapshot(&self) -> Option<BoardSnapshot> {
        self.shared.lock().as_ref().map(|s| s.game.snapshot())
    }

    /// Returns a copy of the active session's deck.
    pub fn deck(&self) -> Option<Deck> {
        self.shared.lock().as_ref().map(|s| s.game.deck().clone())
    }

    /// Returns true while the active session's clock is running.
    pub fn clock_running(&self) -> bool {
        self.shared
            .lock()
            .as_ref()
            .is_some_and(|s| s.timers.ticker_running())
    }
}
