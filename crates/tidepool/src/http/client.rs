//! HTTP client for the backing API.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{QueryError, Result};

/// Authentication method for the backing API.
#[derive(Clone, Debug)]
pub enum ApiAuth {
    /// Bearer token authentication (Authorization: Bearer <token>).
    Bearer(String),
    /// API key in a custom header.
    ApiKey {
        /// Header name (e.g., "X-API-Key").
        header: String,
        /// API key value.
        value: String,
    },
}

/// Configuration for the API client.
#[derive(Clone, Debug)]
pub struct ApiClientConfig {
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Default user agent.
    pub user_agent: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(format!("Tidepool/{} (Rust)", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    base_url: String,
    config: ApiClientConfig,
    default_headers: http::HeaderMap,
    auth: Option<ApiAuth>,
}

impl ApiClientBuilder {
    /// Create a new builder with the specified base URL.
    ///
    /// All resource paths are appended to this base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            config: ApiClientConfig::default(),
            default_headers: http::HeaderMap::new(),
            auth: None,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Add a default header that will be sent with every request.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.default_headers.insert(name, value);
        }
        self
    }

    /// Set bearer token authentication.
    ///
    /// Adds `Authorization: Bearer <token>` to all requests.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(ApiAuth::Bearer(token.into()));
        self
    }

    /// Set API key authentication.
    ///
    /// Adds the specified header with the API key to all requests.
    pub fn api_key(mut self, header: impl Into<String>, key: impl Into<String>) -> Self {
        self.auth = Some(ApiAuth::ApiKey {
            header: header.into(),
            value: key.into(),
        });
        self
    }

    /// Set the authentication method.
    pub fn auth(mut self, auth: ApiAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(ref ua) = self.config.user_agent {
            builder = builder.user_agent(ua);
        }
        builder = builder.default_headers(self.default_headers);

        let client = builder.build()?;

        // Normalize base URL (remove trailing slash).
        let base_url = self.base_url.trim_end_matches('/').to_string();

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                config: self.config,
                auth: self.auth,
            }),
        })
    }
}

/// Internal state for the API client.
struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    config: ApiClientConfig,
    auth: Option<ApiAuth>,
}

/// A thin JSON-over-HTTP client for the backing API.
///
/// Cheaply cloneable and thread-safe; clones share the same connection pool
/// and configuration.
///
/// # Example
///
/// ```ignore
/// use tidepool::http::ApiClient;
///
/// let client = ApiClient::builder("https://api.example.com")
///     .bearer_auth("my-token")
///     .build()?;
///
/// let users: ListEnvelope<User> = client
///     .get_json("/users", &[("page".into(), "1".into())])
///     .await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl ApiClient {
    /// Create a builder for configuring an API client.
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &ApiClientConfig {
        &self.inner.config
    }

    /// GET a resource and decode the JSON response body.
    ///
    /// Non-2xx statuses become [`QueryError::HttpStatus`], with the response
    /// body consumed for the error message when one is present.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let url = self.url_for(path, query)?;
        tracing::debug!(target: "tidepool::http", url = %url, "GET");

        let mut request = self.inner.client.get(url);
        if let Some(auth) = &self.inner.auth {
            request = match auth {
                ApiAuth::Bearer(token) => request.bearer_auth(token),
                ApiAuth::ApiKey { header, value } => request.header(header.as_str(), value.as_str()),
            };
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok().filter(|body| !body.is_empty());
            tracing::debug!(
                target: "tidepool::http",
                status = status.as_u16(),
                "request failed"
            );
            return Err(QueryError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Build the full URL for a resource path plus query pairs.
    fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<url::Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let mut url = url::Url::parse(&format!("{}{}", self.inner.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("has_auth", &self.inner.auth.is_some())
            .finish()
    }
}
