//! Dropdown-style queries with a stale cache.
//!
//! A dropdown query fetches a large, rarely-changing list once (page size
//! 500 by default) and reuses it as the selection source for a picker. The
//! store keeps the last successfully fetched set as a stale cache: a failed
//! background refresh degrades to showing yesterday's items with a warning
//! instead of blanking the control.
//!
//! Two independent error channels make that distinction renderable:
//!
//! - [`DropdownState::error`] — the *initial* load failed; no data exists
//!   yet, the caller shows an empty/blocked state.
//! - [`DropdownState::refresh_error`] — a *subsequent* refresh failed; the
//!   caller keeps showing the cached items and surfaces a non-blocking
//!   warning.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tidepool_core::Signal;

use crate::query::coordinator::RequestCoordinator;
use crate::query::page::{PageFetcher, PageRequest};
use crate::retry::RetryPolicy;

/// Snapshot of a dropdown store, cloned out to subscribers.
#[derive(Clone, Debug)]
pub struct DropdownState<T> {
    /// The cached selection source. Replaced only by a successful fetch.
    pub items: Vec<T>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Failure of the initial load; no data exists yet.
    pub error: Option<String>,
    /// Failure of a refresh; the previously loaded items are still shown.
    pub refresh_error: Option<String>,
    /// True once any load has succeeded; stays true across refresh failures.
    pub has_cached_data: bool,
}

impl<T> DropdownState<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            refresh_error: None,
            has_cached_data: false,
        }
    }
}

/// Tuning for a dropdown store.
#[derive(Clone, Debug)]
pub struct DropdownOptions {
    /// Retry policy applied to every fetch.
    pub retry: RetryPolicy,
    /// How many items one fetch asks for.
    pub page_size: u32,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            page_size: 500,
        }
    }
}

struct DropdownShared<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    retry: RetryPolicy,
    page_size: u32,
    coordinator: RequestCoordinator,
    state: Mutex<DropdownState<T>>,
    disposed: AtomicBool,
    state_changed: Signal<DropdownState<T>>,
}

/// Selection-source store for dropdown controls.
///
/// Cheaply cloneable; clones are handles onto the same store. Owns its
/// coordinator and cache privately, like [`QueryStore`](crate::QueryStore).
pub struct DropdownStore<T> {
    shared: Arc<DropdownShared<T>>,
}

impl<T> Clone for DropdownStore<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> DropdownStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store over the given fetcher.
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>, options: DropdownOptions) -> Self {
        Self {
            shared: Arc::new(DropdownShared {
                fetcher,
                retry: options.retry,
                page_size: options.page_size,
                coordinator: RequestCoordinator::new(),
                state: Mutex::new(DropdownState::empty()),
                disposed: AtomicBool::new(false),
                state_changed: Signal::new(),
            }),
        }
    }

    /// Signal emitted with a fresh snapshot on every state change.
    pub fn state_changed(&self) -> &Signal<DropdownState<T>> {
        &self.shared.state_changed
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> DropdownState<T> {
        self.shared.state.lock().clone()
    }

    /// The cached items.
    pub fn items(&self) -> Vec<T> {
        self.shared.state.lock().items.clone()
    }

    /// True once any load has succeeded, across later refresh failures.
    pub fn has_cached_data(&self) -> bool {
        self.shared.state.lock().has_cached_data
    }

    /// Fetch (or re-fetch) the selection source.
    ///
    /// Existing items stay in place until the new fetch resolves and are
    /// replaced only on success. A failure lands on the error channel
    /// matching the cache state: `error` when nothing was ever loaded,
    /// `refresh_error` when cached items are still on display.
    pub async fn refresh(&self) {
        if self.is_disposed() {
            return;
        }

        self.update(|state| {
            state.loading = true;
        });

        let fetcher = self.shared.fetcher.clone();
        let retry = self.shared.retry;
        let request = PageRequest::new(1, self.shared.page_size);
        let outcome = self
            .shared
            .coordinator
            .issue(move || async move {
                retry
                    .run(|| {
                        let fetcher = fetcher.clone();
                        let request = request.clone();
                        async move { fetcher.fetch(request).await }
                    })
                    .await
            })
            .await;

        let Some(result) = outcome else { return };
        if self.is_disposed() {
            return;
        }

        match result {
            Ok(page) => {
                tracing::debug!(
                    target: "tidepool::dropdown",
                    items = page.items.len(),
                    "refresh succeeded"
                );
                self.update(|state| {
                    state.items = page.items;
                    state.loading = false;
                    state.error = None;
                    state.refresh_error = None;
                    state.has_cached_data = true;
                });
            }
            Err(err) => {
                let message = err.user_message();
                tracing::error!(target: "tidepool::dropdown", error = %err, "refresh failed");
                self.update(|state| {
                    if state.has_cached_data {
                        state.refresh_error = Some(message);
                    } else {
                        state.error = Some(message);
                    }
                    state.loading = false;
                });
            }
        }
    }

    /// Tear the store down: cancel the in-flight fetch and drop all
    /// subscribers. Every operation after this is a no-op.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!(target: "tidepool::dropdown", "store disposed");
        self.shared.coordinator.cancel();
        self.shared.state_changed.disconnect_all();
    }

    /// Check whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::Acquire)
    }

    /// Apply a mutation and publish the new snapshot.
    fn update(&self, mutate: impl FnOnce(&mut DropdownState<T>)) {
        let snapshot = {
            let mut state = self.shared.state.lock();
            mutate(&mut state);
            state.clone()
        };
        self.shared.state_changed.emit(snapshot);
    }
}

impl<T> std::fmt::Debug for DropdownStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("DropdownStore")
            .field("items", &state.items.len())
            .field("has_cached_data", &state.has_cached_data)
            .field("disposed", &self.shared.disposed.load(Ordering::Acquire))
            .finish()
    }
}
