//! Injected configuration for the data layer.
//!
//! Everything the layer needs to know is passed in at construction time;
//! nothing reads the environment from inside a store.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Which page sizes a surface accepts, and the fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSizePolicy {
    default: u32,
    allowed: Vec<u32>,
}

impl Default for PageSizePolicy {
    fn default() -> Self {
        Self::new(10, [10, 20, 50, 100])
    }
}

impl PageSizePolicy {
    /// Create a policy. The default size is always part of the allowed set.
    pub fn new(default: u32, allowed: impl Into<Vec<u32>>) -> Self {
        let mut allowed = allowed.into();
        if !allowed.contains(&default) {
            allowed.push(default);
        }
        Self { default, allowed }
    }

    /// The fallback page size.
    pub fn default_size(&self) -> u32 {
        self.default
    }

    /// The allowed page sizes.
    pub fn allowed(&self) -> &[u32] {
        &self.allowed
    }

    /// Check whether `size` is in the allowed set.
    pub fn is_allowed(&self, size: u32) -> bool {
        self.allowed.contains(&size)
    }

    /// Clamp to the allowed set; out-of-set values fall back to the default.
    pub fn sanitize(&self, size: u32) -> u32 {
        if self.is_allowed(size) {
            size
        } else {
            tracing::debug!(
                target: "tidepool::config",
                size,
                fallback = self.default,
                "page size not allowed, falling back"
            );
            self.default
        }
    }
}

/// Configuration for a data layer instance.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tidepool::{DataLayerConfig, RetryPolicy};
///
/// let config = DataLayerConfig::new("https://api.example.com")
///     .default_page_size(20)
///     .retry(RetryPolicy::new(2, Duration::from_millis(250)))
///     .debounce_wait(Duration::from_millis(300));
/// ```
#[derive(Clone, Debug)]
pub struct DataLayerConfig {
    /// Base URL all resource paths are appended to.
    pub base_url: String,
    /// Page size used when none is specified.
    pub default_page_size: u32,
    /// Page sizes list views may request.
    pub allowed_page_sizes: Vec<u32>,
    /// Page size for dropdown-style "fetch everything" queries.
    pub dropdown_page_size: u32,
    /// Retry policy applied to every fetch.
    pub retry: RetryPolicy,
    /// Debounce window for search input.
    pub debounce_wait: Duration,
}

impl DataLayerConfig {
    /// Create a configuration with the given base URL and defaults for
    /// everything else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_page_size: 10,
            allowed_page_sizes: vec![10, 20, 50, 100],
            dropdown_page_size: 500,
            retry: RetryPolicy::default(),
            debounce_wait: Duration::from_millis(500),
        }
    }

    /// Set the default page size.
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the allowed page sizes.
    pub fn allowed_page_sizes(mut self, sizes: impl Into<Vec<u32>>) -> Self {
        self.allowed_page_sizes = sizes.into();
        self
    }

    /// Set the page size for dropdown-style queries.
    pub fn dropdown_page_size(mut self, size: u32) -> Self {
        self.dropdown_page_size = size;
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Disable automatic retries.
    pub fn no_retry(mut self) -> Self {
        self.retry = RetryPolicy::no_retry();
        self
    }

    /// Set the debounce window for search input.
    pub fn debounce_wait(mut self, wait: Duration) -> Self {
        self.debounce_wait = wait;
        self
    }

    /// The page-size policy list views validate against.
    pub fn page_size_policy(&self) -> PageSizePolicy {
        PageSizePolicy::new(self.default_page_size, self.allowed_page_sizes.clone())
    }
}
