//! Error types for the data layer.

use std::fmt;

use crate::query::params::ParamError;

/// Errors produced while fetching or validating a paged query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Request superseded by a newer one. Internal bookkeeping only: the
    /// coordinator swallows this before it can reach a store's error field.
    Cancelled,
    /// Transport-level failure (offline, DNS, connection reset).
    Network(String),
    /// Request timed out.
    Timeout,
    /// Invalid URL provided.
    InvalidUrl(String),
    /// JSON deserialization error.
    Json(String),
    /// HTTP error status (non-2xx).
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },
    /// Malformed pagination parameters, caught before any network call.
    InvalidParams(ParamError),
}

impl QueryError {
    /// Check whether this error is the internal cancellation marker.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// A message suitable for showing to the user.
    ///
    /// Raw transport/serde error chains never leak through here; the UI gets a
    /// short, status-aware string instead.
    pub fn user_message(&self) -> String {
        match self {
            Self::Cancelled => "Request was cancelled".to_string(),
            Self::Network(_) | Self::Timeout => "Cannot reach server".to_string(),
            Self::InvalidUrl(_) => "Invalid request address".to_string(),
            Self::Json(_) => "Invalid server response".to_string(),
            Self::HttpStatus { status, .. } => match status {
                404 => "Not found".to_string(),
                403 => "Forbidden".to_string(),
                500..=599 => "Server error".to_string(),
                status => format!("Request failed (HTTP {status})"),
            },
            Self::InvalidParams(reason) => reason.to_string(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Request was cancelled"),
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::HttpStatus { status, message } => {
                if let Some(msg) = message {
                    write!(f, "HTTP {status}: {msg}")
                } else {
                    write!(f, "HTTP {status}")
                }
            }
            Self::InvalidParams(reason) => write!(f, "Invalid parameters: {reason}"),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Json(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for QueryError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<ParamError> for QueryError {
    fn from(err: ParamError) -> Self {
        Self::InvalidParams(err)
    }
}

/// A specialized Result type for data-layer operations.
pub type Result<T> = std::result::Result<T, QueryError>;
