//! The wire envelope returned by list endpoints.

use serde::Deserialize;

use crate::query::Page;

/// Paging metadata as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationMeta {
    /// 1-based page number actually served.
    pub page: u32,
    /// Page size actually applied.
    pub limit: u32,
    /// Total items across all pages.
    pub total: u64,
    /// Total pages.
    pub total_pages: u32,
}

/// The fixed response envelope every list endpoint returns:
///
/// ```json
/// {
///   "data": [ ... ],
///   "pagination": { "page": 1, "limit": 10, "total": 25, "total_pages": 3 }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    /// The entities on this page.
    pub data: Vec<T>,
    /// Paging metadata.
    pub pagination: PaginationMeta,
}

impl<T> ListEnvelope<T> {
    /// Convert into a [`Page`], trusting the server's reported paging values
    /// over whatever was requested (the server may clamp).
    pub fn into_page(self) -> Page<T> {
        let PaginationMeta {
            page,
            limit,
            total,
            total_pages,
        } = self.pagination;

        let mut items = self.data;
        if items.len() as u64 > u64::from(limit) && limit > 0 {
            // A page never carries more items than its own reported limit.
            tracing::debug!(
                target: "tidepool::http",
                received = items.len(),
                limit,
                "server sent more items than its limit, truncating"
            );
            items.truncate(limit as usize);
        }

        Page {
            items,
            page,
            page_size: limit,
            total_items: total,
            total_pages,
        }
    }
}
