//! Page data and the fetcher seam.

use futures_util::future::BoxFuture;

use crate::error::Result;

/// Parameters of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Trimmed search filter; `None` means unfiltered.
    pub search: Option<String>,
}

impl PageRequest {
    /// Create an unfiltered request.
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

    /// The query pairs this request puts on the wire.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs
    }
}

/// One page of results plus paging metadata.
///
/// Items keep the server's order; the client never re-sorts. Invariant:
/// `items.len() <= page_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The items on this page, in server order.
    pub items: Vec<T>,
    /// 1-based page number this slice represents.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total pages; zero when `total_items` is zero.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// An empty first page.
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size,
            total_items: 0,
            total_pages: 0,
        }
    }

    /// Check whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// The seam between stores and the transport.
///
/// The production implementation is [`HttpPageFetcher`](crate::http::HttpPageFetcher);
/// tests substitute in-process fakes.
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch one page of results.
    fn fetch(&self, request: PageRequest) -> BoxFuture<'_, Result<Page<T>>>;
}
