//! URL-backed pagination state.
//!
//! List views keep their `page`/`limit` (and optionally `search`) in the URL
//! query string so pagination state survives reloads and can be shared. The
//! address bar itself is behind the [`AddressBar`] port: the browser shell,
//! a desktop webview, or a test fake all plug in the same way.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::PageSizePolicy;

/// Pagination state mirrored into the URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlState {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Optional search filter; omitted from the query string when `None`.
    pub search: Option<String>,
}

impl UrlState {
    /// Create an unfiltered state.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search: None,
        }
    }

    /// Attach a search filter. The term is trimmed; an empty term clears the
    /// filter.
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self
    }

    /// Serialize to a canonical query string (`page=2&limit=20[&search=..]`).
    pub fn serialize(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("page", &self.page.to_string());
        serializer.append_pair("limit", &self.page_size.to_string());
        if let Some(search) = &self.search {
            serializer.append_pair("search", search);
        }
        serializer.finish()
    }

    /// Parse from a query string.
    ///
    /// `page` defaults to 1 and `limit` to the policy default when absent,
    /// malformed, or not in the allowed set. A leading `?` is accepted.
    /// Idempotent: parsing the same string twice yields the same state.
    pub fn parse(query: &str, policy: &PageSizePolicy) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut page = 1u32;
        let mut page_size = policy.default_size();
        let mut search = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    if let Ok(parsed) = value.parse::<u32>()
                        && parsed >= 1
                    {
                        page = parsed;
                    }
                }
                "limit" => {
                    if let Ok(parsed) = value.parse::<u32>()
                        && policy.is_allowed(parsed)
                    {
                        page_size = parsed;
                    }
                }
                "search" => {
                    let term = value.trim();
                    if !term.is_empty() {
                        search = Some(term.to_string());
                    }
                }
                _ => {}
            }
        }

        Self {
            page,
            page_size,
            search,
        }
    }
}

/// Port to whatever owns the address bar.
pub trait AddressBar: Send + Sync {
    /// Replace the current query string without triggering a navigation.
    fn replace_query(&self, query: &str);

    /// The current query string (with or without a leading `?`).
    fn query(&self) -> String;
}

/// Mirrors pagination state between a query store and an address bar.
///
/// All writes go through the one serializer so the bar never sees a partial
/// or interleaved state; identical consecutive states are not re-pushed.
pub struct UrlSync {
    bar: Arc<dyn AddressBar>,
    policy: PageSizePolicy,
    last_pushed: Mutex<Option<UrlState>>,
}

impl UrlSync {
    /// Create a sync against the given address bar.
    pub fn new(bar: Arc<dyn AddressBar>, policy: PageSizePolicy) -> Self {
        Self {
            bar,
            policy,
            last_pushed: Mutex::new(None),
        }
    }

    /// Push state into the address bar.
    pub fn push(&self, state: &UrlState) {
        let mut last = self.last_pushed.lock();
        if last.as_ref() == Some(state) {
            return;
        }
        let query = state.serialize();
        tracing::trace!(target: "tidepool::url", query = %query, "pushing url state");
        self.bar.replace_query(&query);
        *last = Some(state.clone());
    }

    /// Read the current state back from the address bar.
    pub fn read(&self) -> UrlState {
        UrlState::parse(&self.bar.query(), &self.policy)
    }
}

impl std::fmt::Debug for UrlSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSync")
            .field("policy", &self.policy)
            .field("last_pushed", &*self.last_pushed.lock())
            .finish()
    }
}
