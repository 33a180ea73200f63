//! Cancellable scheduled callbacks owned by a session.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, instrument};

/// Timers belonging to one session.
///
/// Dropping the set aborts every pending callback, so replacing or
/// abandoning a session can never leak a callback into the next one.
#[derive(Debug)]
pub(crate) struct SessionTimers {
    runtime: Handle,
    preview: Option<JoinHandle<()>>,
    mismatch: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl SessionTimers {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            preview: None,
            mismatch: None,
            ticker: None,
        }
    }

    /// Schedules the end of the preview.
    pub(crate) fn schedule_preview_end<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        replace(&mut self.preview, after(&self.runtime, delay, action));
    }

    /// Schedules clearing a mismatched pair.
    pub(crate) fn schedule_mismatch_clear<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        replace(&mut self.mismatch, after(&self.runtime, delay, action));
    }

    /// Starts the elapsed-time ticker unless it is already running.
    pub(crate) fn start_ticker<F>(&mut self, period: Duration, action: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        if self.ticker.is_some() {
            return;
        }
        self.ticker = Some(every(&self.runtime, period, action));
    }

    /// Returns true if the ticker has been started and not stopped.
    pub(crate) fn ticker_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the ticker permanently.
    pub(crate) fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    /// Aborts every pending callback.
    #[instrument(skip(self))]
    pub(crate) fn cancel_all(&mut self) {
        for handle in [
            self.preview.take(),
            self.mismatch.take(),
            self.ticker.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
        debug!("Session timers cancelled");
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
    if let Some(previous) = slot.replace(handle) {
        previous.abort();
    }
}

/// Runs `action` once after `delay`.
fn after<F>(runtime: &Handle, delay: Duration, action: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    runtime.spawn(async move {
        sleep(delay).await;
        action();
    })
}

/// Runs `action` every `period` until it breaks. The first run happens one
/// full period after the call.
fn every<F>(runtime: &Handle, period: Duration, mut action: F) -> JoinHandle<()>
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    runtime.spawn(async move {
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval fires immediately; skip that one.
        ticks.tick().await;
        loop {
            ticks.tick().await;
            if action().is_break() {
                break;
            }
        }
    })
}
