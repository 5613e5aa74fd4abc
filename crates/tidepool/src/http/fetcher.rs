//! HTTP-backed page fetcher.

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::envelope::ListEnvelope;
use crate::error::Result;
use crate::query::{Page, PageFetcher, PageRequest};

/// Fetches pages from a list endpoint (`GET <base>/<resource>?page=..&limit=..`).
///
/// One fetcher serves one resource; stores hold it behind the
/// [`PageFetcher`] seam so tests can substitute in-process fakes.
pub struct HttpPageFetcher {
    client: ApiClient,
    resource: String,
}

impl HttpPageFetcher {
    /// Create a fetcher for the given resource path.
    pub fn new(client: ApiClient, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        let resource = if resource.starts_with('/') {
            resource
        } else {
            format!("/{resource}")
        };
        Self { client, resource }
    }

    /// The resource path this fetcher serves.
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl<T> PageFetcher<T> for HttpPageFetcher
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn fetch(&self, request: PageRequest) -> BoxFuture<'_, Result<Page<T>>> {
        Box::pin(async move {
            let envelope: ListEnvelope<T> = self
                .client
                .get_json(&self.resource, &request.query_pairs())
                .await?;
            Ok(envelope.into_page())
        })
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("resource", &self.resource)
            .finish()
    }
}
