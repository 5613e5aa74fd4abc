//! Single-flight request coordination.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{QueryError, Result};

/// Ensures at most one logical request is outstanding; newer requests
/// supersede older ones.
///
/// Each issued request is tagged with a monotonically increasing generation.
/// Issuing a new request signals the previous one's cancellation channel —
/// dropping its future, which aborts the underlying transport call and any
/// pending backoff sleep — and bumps the generation. A request whose
/// generation is no longer current when it settles is discarded, never
/// surfaced: results are applied in issue order of acceptance, not completion
/// order.
pub struct RequestCoordinator {
    /// Generation of the most recently issued request.
    generation: AtomicU64,
    /// Cancellation channel of the outstanding request, if any.
    cancel_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl Default for RequestCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCoordinator {
    /// Create a coordinator with no outstanding request.
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            cancel_tx: Mutex::new(None),
        }
    }

    /// The generation of the most recently issued request.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Check whether a request is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.cancel_tx.lock().is_some()
    }

    /// Cancel the outstanding request without issuing a new one.
    ///
    /// The cancelled request's eventual resolution is discarded.
    pub fn cancel(&self) {
        if let Some(tx) = self.cancel_tx.lock().take() {
            let _ = tx.send(());
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Issue a request, superseding any outstanding one.
    ///
    /// Returns `None` when this request was itself superseded or cancelled
    /// while in flight; callers treat that as "do nothing". Cancellation is
    /// swallowed here — it never reaches a store as an error.
    pub async fn issue<R, F, Fut>(&self, op: F) -> Option<Result<R>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let (tx, rx) = oneshot::channel();
        let generation = {
            let mut slot = self.cancel_tx.lock();
            if let Some(previous) = slot.take() {
                tracing::debug!(
                    target: "tidepool::coordinator",
                    "superseding in-flight request"
                );
                let _ = previous.send(());
            }
            *slot = Some(tx);
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };

        let result = tokio::select! {
            result = op() => result,
            _ = rx => Err(QueryError::Cancelled),
        };

        // A newer request may have been issued while this one was in flight;
        // its resolution wins regardless of completion order.
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(
                target: "tidepool::coordinator",
                generation,
                "discarding superseded result"
            );
            return None;
        }

        {
            let mut slot = self.cancel_tx.lock();
            // Only clear the channel if it is still ours.
            if self.generation.load(Ordering::Acquire) == generation {
                slot.take();
            }
        }

        match result {
            Err(QueryError::Cancelled) => None,
            other => Some(other),
        }
    }
}

impl std::fmt::Debug for RequestCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCoordinator")
            .field("generation", &self.current_generation())
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}
