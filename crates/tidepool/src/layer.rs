//! Construction root for the data layer.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::DataLayerConfig;
use crate::error::Result;
use crate::http::{ApiClient, HttpPageFetcher};
use crate::query::{
    DropdownOptions, DropdownStore, QueryOptions, QueryStore,
};

/// Ties configuration and transport together and hands out stores.
///
/// Each store produced here is independently owned by its view: stores share
/// the cheaply-cloneable [`ApiClient`] (one connection pool) and nothing
/// else.
///
/// # Example
///
/// ```ignore
/// use tidepool::{DataLayer, DataLayerConfig};
///
/// let layer = DataLayer::new(
///     DataLayerConfig::new("https://api.example.com").default_page_size(20),
/// )?;
///
/// let tickets = layer.list_query::<Ticket>("/tickets");
/// let phones = layer.dropdown_query::<Phone>("/phones");
/// ```
pub struct DataLayer {
    client: ApiClient,
    config: DataLayerConfig,
}

impl DataLayer {
    /// Create a layer with a client built from the configuration.
    pub fn new(config: DataLayerConfig) -> Result<Self> {
        let client = ApiClient::builder(&config.base_url).build()?;
        Ok(Self { client, config })
    }

    /// Create a layer around an already-configured client (custom auth,
    /// timeouts, default headers).
    pub fn with_client(client: ApiClient, config: DataLayerConfig) -> Self {
        Self { client, config }
    }

    /// The underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The layer's configuration.
    pub fn config(&self) -> &DataLayerConfig {
        &self.config
    }

    /// A paginated query store for a list endpoint.
    pub fn list_query<T>(&self, resource: &str) -> QueryStore<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let fetcher = Arc::new(HttpPageFetcher::new(self.client.clone(), resource));
        QueryStore::new(
            fetcher,
            QueryOptions {
                retry: self.config.retry,
                page_sizes: self.config.page_size_policy(),
                debounce_wait: self.config.debounce_wait,
            },
        )
    }

    /// A dropdown-style store for a selection-source endpoint.
    pub fn dropdown_query<T>(&self, resource: &str) -> DropdownStore<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let fetcher = Arc::new(HttpPageFetcher::new(self.client.clone(), resource));
        DropdownStore::new(
            fetcher,
            DropdownOptions {
                retry: self.config.retry,
                page_size: self.config.dropdown_page_size,
            },
        )
    }
}

impl std::fmt::Debug for DataLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLayer")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}
