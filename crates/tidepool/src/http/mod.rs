//! HTTP transport for the data layer.
//!
//! A thin JSON-over-HTTP client plus the fixed response envelope list
//! endpoints return.
//!
//! # Example
//!
//! ```ignore
//! use tidepool::http::{ApiClient, HttpPageFetcher};
//!
//! let client = ApiClient::builder("https://api.example.com")
//!     .bearer_auth("my-token")
//!     .build()?;
//!
//! let fetcher = HttpPageFetcher::new(client, "/tickets");
//! ```

mod client;
mod envelope;
mod fetcher;

pub use client::{ApiAuth, ApiClient, ApiClientBuilder, ApiClientConfig};
pub use envelope::{ListEnvelope, PaginationMeta};
pub use fetcher::HttpPageFetcher;
