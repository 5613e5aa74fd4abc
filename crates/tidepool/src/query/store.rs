//! The paginated-list engine.
//!
//! [`QueryStore`] is the single source of truth a list view renders from. It
//! is an explicit state machine (`Idle -> Loading -> Ready | Error`, with
//! `Ready | Error -> Loading` repeatable) driven by discrete operations, and
//! publishes every state change on a [`Signal`] — the UI layer merely
//! subscribes.
//!
//! A store survives flaky networks without blanking the view: a failed fetch
//! keeps the previous result on screen, retries run behind the scenes with
//! exponential backoff, and rapid page / page-size / search changes supersede
//! one another instead of racing.
//!
//! # Example
//!
//! ```ignore
//! use tidepool::{QueryStore, QueryStatus};
//!
//! let store: QueryStore<Ticket> = layer.list_query("/tickets");
//!
//! store.state_changed().connect(|state| {
//!     match state.status {
//!         QueryStatus::Ready => render_rows(&state.result.items),
//!         QueryStatus::Error => show_banner(state.error.as_deref()),
//!         _ => {}
//!     }
//! });
//!
//! store.fetch_page(1, 10, "").await;
//! store.go_to_page(2).await;
//! store.change_search("printer");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tidepool_core::{Debouncer, Signal};

use crate::config::PageSizePolicy;
use crate::error::QueryError;
use crate::query::coordinator::RequestCoordinator;
use crate::query::page::{Page, PageFetcher, PageRequest};
use crate::query::params::{self, ParamCheck};
use crate::query::url_state::{UrlState, UrlSync};
use crate::retry::RetryPolicy;

/// Lifecycle of a paged query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    /// No fetch has been issued yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed; `result` still holds the previous data.
    Error,
}

/// Snapshot of a query store, cloned out to subscribers.
#[derive(Clone, Debug)]
pub struct QueryState<T> {
    /// The page the view renders. Never blanked by a failed fetch.
    pub result: Page<T>,
    /// Where the query is in its lifecycle.
    pub status: QueryStatus,
    /// User-displayable message for the last failure.
    pub error: Option<String>,
    /// Last successfully fetched page. Only overwritten by a successful
    /// fetch, never cleared by a failed one; consumers may render it as a
    /// degraded view while `status` is `Error`.
    pub last_good: Option<Page<T>>,
}

/// Tuning for a query store, injected at construction.
#[derive(Clone, Debug)]
pub struct QueryOptions {
    /// Retry policy applied to every fetch.
    pub retry: RetryPolicy,
    /// Allowed page sizes and the fallback.
    pub page_sizes: PageSizePolicy,
    /// Debounce window for search input.
    pub debounce_wait: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            page_sizes: PageSizePolicy::default(),
            debounce_wait: Duration::from_millis(500),
        }
    }
}

struct StoreShared<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    retry: RetryPolicy,
    page_sizes: PageSizePolicy,
    coordinator: RequestCoordinator,
    debouncer: Debouncer,
    state: Mutex<QueryState<T>>,
    /// The current `(page, page_size, search)` tuple.
    request: Mutex<PageRequest>,
    url: Mutex<Option<UrlSync>>,
    disposed: AtomicBool,
    state_changed: Signal<QueryState<T>>,
}

/// The paginated-list engine behind every list view.
///
/// Cheaply cloneable; clones are handles onto the same store. Each store
/// privately owns its request coordinator, debouncer, and snapshots — there
/// is no global registry and no sharing between stores.
pub struct QueryStore<T> {
    shared: Arc<StoreShared<T>>,
}

impl<T> Clone for QueryStore<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> QueryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store over the given fetcher.
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>, options: QueryOptions) -> Self {
        let default_size = options.page_sizes.default_size();
        Self {
            shared: Arc::new(StoreShared {
                fetcher,
                retry: options.retry,
                page_sizes: options.page_sizes,
                coordinator: RequestCoordinator::new(),
                debouncer: Debouncer::new(options.debounce_wait),
                state: Mutex::new(QueryState {
                    result: Page::empty(default_size),
                    status: QueryStatus::Idle,
                    error: None,
                    last_good: None,
                }),
                request: Mutex::new(PageRequest::new(1, default_size)),
                url: Mutex::new(None),
                disposed: AtomicBool::new(false),
                state_changed: Signal::new(),
            }),
        }
    }

    /// Signal emitted with a fresh snapshot on every state change.
    pub fn state_changed(&self) -> &Signal<QueryState<T>> {
        &self.shared.state_changed
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> QueryState<T> {
        self.shared.state.lock().clone()
    }

    /// Where the query is in its lifecycle.
    pub fn status(&self) -> QueryStatus {
        self.shared.state.lock().status
    }

    /// The current `(page, page_size, search)` tuple.
    pub fn request(&self) -> PageRequest {
        self.shared.request.lock().clone()
    }

    /// Mirror this store's pagination state into an address bar.
    ///
    /// Pushed after every successful fetch; see
    /// [`rehydrate_from_url`](Self::rehydrate_from_url) for the read side.
    pub fn bind_url(&self, sync: UrlSync) {
        *self.shared.url.lock() = Some(sync);
    }

    /// Fetch a page.
    ///
    /// Parameters are validated first: a correctable page (zero, or past the
    /// last known page) is silently corrected; an unusable page size sets an
    /// error without any network call. The fetch itself is retried per the
    /// store's policy and supersedes any fetch still in flight. On success
    /// the result replaces the current page and the bound URL state is
    /// pushed; on failure the previous result stays visible alongside the
    /// error message.
    pub async fn fetch_page(&self, page: u32, page_size: u32, search: &str) {
        if self.is_disposed() {
            return;
        }

        // Clamp against the last successfully reported total; zero means no
        // clamp information yet.
        let known_total = {
            let state = self.shared.state.lock();
            state
                .last_good
                .as_ref()
                .map(|page| page.total_items)
                .unwrap_or(0)
        };

        let page = match params::validate(i64::from(page), i64::from(page_size), known_total) {
            ParamCheck::Valid => page,
            ParamCheck::Invalid {
                corrected_page: Some(corrected),
                reason,
            } => {
                tracing::debug!(
                    target: "tidepool::store",
                    requested = page,
                    corrected,
                    reason = %reason,
                    "corrected page"
                );
                corrected
            }
            ParamCheck::Invalid {
                corrected_page: None,
                reason,
            } => {
                tracing::warn!(target: "tidepool::store", reason = %reason, "rejected fetch");
                self.update(|state| {
                    state.status = QueryStatus::Error;
                    state.error = Some(QueryError::from(reason).user_message());
                });
                return;
            }
        };

        let request = PageRequest::new(page, page_size).with_search(search);
        *self.shared.request.lock() = request.clone();

        self.update(|state| {
            state.status = QueryStatus::Loading;
        });

        let fetcher = self.shared.fetcher.clone();
        let retry = self.shared.retry;
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

        // Superseded by a newer fetch, or the store was torn down meanwhile.
        let Some(result) = outcome else { return };
        if self.is_disposed() {
            return;
        }

        match result {
            Ok(fetched) => {
                tracing::debug!(
                    target: "tidepool::store",
                    page = fetched.page,
                    items = fetched.items.len(),
                    total = fetched.total_items,
                    "fetch succeeded"
                );
                // The server's reported paging values are authoritative.
                {
                    let mut request = self.shared.request.lock();
                    request.page = fetched.page;
                    request.page_size = fetched.page_size;
                }
                self.update(|state| {
                    state.result = fetched.clone();
                    state.last_good = Some(fetched);
                    state.status = QueryStatus::Ready;
                    state.error = None;
                });
                self.push_url();
            }
            Err(err) => {
                tracing::error!(target: "tidepool::store", error = %err, "fetch failed");
                self.update(|state| {
                    state.status = QueryStatus::Error;
                    state.error = Some(err.user_message());
                });
            }
        }
    }

    /// Go to a page, keeping the current page size and search.
    ///
    /// A no-op when `page` equals the current page (except for the very
    /// first fetch), so repeated clicks on the same pager button cost one
    /// request, not several.
    pub async fn go_to_page(&self, page: u32) {
        let (current, status) = {
            let request = self.shared.request.lock();
            (request.clone(), self.shared.state.lock().status)
        };
        if status != QueryStatus::Idle && page == current.page {
            tracing::trace!(target: "tidepool::store", page, "already on page");
            return;
        }
        self.fetch_page(page, current.page_size, current.search.as_deref().unwrap_or(""))
            .await;
    }

    /// Switch to a new page size, resetting to page 1.
    ///
    /// Sizes outside the allowed set fall back to the configured default.
    pub async fn change_page_size(&self, size: u32) {
        let size = self.shared.page_sizes.sanitize(size);
        let search = {
            let request = self.shared.request.lock();
            request.search.clone().unwrap_or_default()
        };
        self.fetch_page(1, size, &search).await;
    }

    /// Change the search filter.
    ///
    /// The commit is debounced: rapid keystrokes coalesce into a single
    /// fetch using the last value. A committed new term resets to page 1;
    /// committing the term already in effect is a no-op.
    pub fn change_search(&self, term: &str) {
        if self.is_disposed() {
            return;
        }
        let term = term.trim().to_string();
        let store = self.clone();
        self.shared.debouncer.call(async move {
            store.commit_search(term).await;
        });
    }

    /// Re-issue the current `(page, page_size, search)` tuple.
    ///
    /// Call after a mutation elsewhere invalidates the page on display.
    pub async fn refresh(&self) {
        let request = self.shared.request.lock().clone();
        self.fetch_page(
            request.page,
            request.page_size,
            request.search.as_deref().unwrap_or(""),
        )
        .await;
    }

    /// Re-read pagination state from the bound address bar.
    ///
    /// Fetches only when the parsed values differ from the current ones, so
    /// back/forward navigation does not loop into redundant refetches.
    pub async fn rehydrate_from_url(&self) {
        let parsed = {
            let url = self.shared.url.lock();
            match url.as_ref() {
                Some(sync) => sync.read(),
                None => return,
            }
        };
        let (current, status) = {
            let request = self.shared.request.lock();
            (request.clone(), self.shared.state.lock().status)
        };
        let current_state = UrlState {
            page: current.page,
            page_size: current.page_size,
            search: current.search,
        };
        if status != QueryStatus::Idle && parsed == current_state {
            tracing::trace!(target: "tidepool::store", "url state unchanged");
            return;
        }
        self.fetch_page(
            parsed.page,
            parsed.page_size,
            parsed.search.as_deref().unwrap_or(""),
        )
        .await;
    }

    /// Tear the store down: cancel the in-flight fetch and the pending
    /// debounce timer, and drop all subscribers.
    ///
    /// Every operation after this is a no-op. Call from the owning view's
    /// teardown path.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!(target: "tidepool::store", "store disposed");
        self.shared.debouncer.cancel();
        self.shared.coordinator.cancel();
        self.shared.state_changed.disconnect_all();
    }

    /// Check whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::Acquire)
    }

    async fn commit_search(&self, term: String) {
        let (current, page_size) = {
            let request = self.shared.request.lock();
            (
                request.search.clone().unwrap_or_default(),
                request.page_size,
            )
        };
        if term == current {
            tracing::trace!(target: "tidepool::store", "search term unchanged");
            return;
        }
        self.fetch_page(1, page_size, &term).await;
    }

    /// Apply a mutation and publish the new snapshot.
    fn update(&self, mutate: impl FnOnce(&mut QueryState<T>)) {
        let snapshot = {
            let mut state = self.shared.state.lock();
            mutate(&mut state);
            state.clone()
        };
        self.shared.state_changed.emit(snapshot);
    }

    fn push_url(&self) {
        let request = self.shared.request.lock().clone();
        let url = self.shared.url.lock();
        if let Some(sync) = url.as_ref() {
            sync.push(&UrlState {
                page: request.page,
                page_size: request.page_size,
                search: request.search,
            });
        }
    }
}

impl<T> std::fmt::Debug for QueryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore")
            .field("request", &*self.shared.request.lock())
            .field("disposed", &self.shared.disposed.load(Ordering::Acquire))
            .finish()
    }
}
