//! Debounced task scheduling for coalescing rapid preference writes.
//!
//! Drag-resize produces a burst of width updates; writing each one to SQLite
//! would be wasteful. A `Debouncer` holds at most one pending task: every
//! `schedule` call aborts the previous pending task and starts a fresh delay,
//! so only the last write in a burst lands. Dropping the debouncer aborts any
//! pending task, which is the teardown path that prevents a write racing past
//! the owner's lifetime.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Default settle delay for persistence writes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Coalesces rapid calls into a single deferred execution.
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer that runs work on the given runtime after `delay`.
    pub fn new(runtime: Handle, delay: Duration) -> Self {
        Self { delay, runtime, pending: Mutex::new(None) }
    }

    /// Schedule `work` to run after the settle delay.
    ///
    /// Cancels any previously scheduled work that has not yet run.
    pub fn schedule<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let delay = self.delay;
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            work();
        }));
    }

    /// Cancel pending work without running it.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    /// Whether a scheduled task is still outstanding.
    ///
    /// A finished task counts as not pending even before the next `schedule`.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
