//! Debounce timer for coalescing bursts of events.
//!
//! A [`Debouncer`] turns a stream of rapid trigger events (keystrokes in a
//! search box) into a single deferred invocation: each call resets the timer,
//! and only the last task scheduled within the window actually runs.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tidepool_core::Debouncer;
//!
//! let debouncer = Debouncer::new(Duration::from_millis(500));
//!
//! // Only the last of these runs, 500ms after the final call.
//! debouncer.call(async { commit_search("a").await });
//! debouncer.call(async { commit_search("ab").await });
//! debouncer.call(async { commit_search("abc").await });
//! ```

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Coalesces bursts of calls into a single deferred task.
///
/// Each [`call`](Self::call) aborts the previously scheduled task (whether it
/// is still waiting out the delay or not yet polled) and schedules the new one
/// to run after the configured wait. Dropping the debouncer cancels any
/// pending task, so an owning view that is torn down never fires a fetch
/// against a dead context.
///
/// Requires a tokio runtime; the deferred task is spawned on it.
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given wait window.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    /// The configured wait window.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Schedule `task` to run after the wait window, superseding any
    /// previously scheduled task.
    pub fn call<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let wait = self.wait;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            task.await;
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            tracing::trace!(target: "tidepool_core::debounce", "superseding pending task");
            previous.abort();
        }
    }

    /// Discard the pending task, if any.
    ///
    /// Returns `true` if a task was pending and has been cancelled.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Check whether a deferred task is still waiting to run.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn burst_runs_only_last_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = Arc::new(AtomicU32::new(0));

        for value in 1..=5u32 {
            let fired = fired.clone();
            debouncer.call(async move {
                fired.store(value, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn task_waits_out_the_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = Arc::new(AtomicU32::new(0));

        let f = fired.clone();
        debouncer.call(async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = Arc::new(AtomicU32::new(0));

        let f = fired.clone();
        debouncer.call(async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_discards_pending_task() {
        let fired = Arc::new(AtomicU32::new(0));

        {
            let debouncer = Debouncer::new(Duration::from_millis(500));
            let f = fired.clone();
            debouncer.call(async move {
                f.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
