//! Resilient paged data access for event-loop UIs.
//!
//! Tidepool is the data layer a list-heavy admin UI is built on: paginated
//! queries that survive flaky networks without freezing or blanking the
//! view, and dropdown selection sources that degrade to stale data instead
//! of an empty control.
//!
//! Every list page and picker is backed by a store:
//!
//! - **[`QueryStore`]**: the paginated-list engine. Explicit state machine
//!   (`Idle | Loading | Ready | Error`), retry with exponential backoff,
//!   single-flight fetches (a newer request supersedes an older one),
//!   debounced search, URL-backed pagination state.
//! - **[`DropdownStore`]**: "fetch up to N items once, reuse as selection
//!   source" queries with a stale cache and separate initial-load /
//!   refresh error channels.
//!
//! # Fetching a list
//!
//! ```ignore
//! use tidepool::{DataLayer, DataLayerConfig, QueryStatus};
//!
//! let layer = DataLayer::new(DataLayerConfig::new("https://api.example.com"))?;
//! let tickets = layer.list_query::<Ticket>("/tickets");
//!
//! // The view subscribes; the store drives.
//! tickets.state_changed().connect(|state| match state.status {
//!     QueryStatus::Ready => render(&state.result.items),
//!     QueryStatus::Error => banner(state.error.as_deref()),
//!     _ => {}
//! });
//!
//! tickets.fetch_page(1, 10, "").await;
//! tickets.go_to_page(2).await;      // no-op if already on page 2
//! tickets.change_search("printer"); // debounced, commits once
//! ```
//!
//! # Populating a dropdown
//!
//! ```ignore
//! let phones = layer.dropdown_query::<Phone>("/phones");
//! phones.refresh().await;
//!
//! // Later, a refresh that fails keeps the cached items:
//! phones.refresh().await;
//! assert!(phones.has_cached_data());
//! ```
//!
//! # Wire contract
//!
//! Stores consume `GET <base>/<resource>?page=<n>&limit=<n>[&search=<term>]`
//! returning the fixed envelope
//! `{ "data": [...], "pagination": { "page", "limit", "total", "total_pages" } }`;
//! the server's reported paging values win over the requested ones.

pub mod config;
mod error;
pub mod http;
mod layer;
pub mod query;
mod retry;

pub use config::{DataLayerConfig, PageSizePolicy};
pub use error::{QueryError, Result};
pub use layer::DataLayer;
pub use query::{
    AddressBar, DropdownOptions, DropdownState, DropdownStore, Page, PageFetcher, PageRequest,
    QueryOptions, QueryState, QueryStatus, QueryStore, RequestCoordinator, UrlState, UrlSync,
};
pub use query::params::{MAX_PAGE_SIZE, ParamCheck, ParamError, total_pages, validate};
pub use retry::RetryPolicy;

// Re-export the signal primitives stores publish on.
pub use tidepool_core::{ConnectionGuard, ConnectionId, Signal};
