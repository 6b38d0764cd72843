//! Repository transport error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the coupon repository.
///
/// These never cross into presentation: the catalog cache converts them
/// into an empty result with a side-channel error description.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// HTTP error response.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Repository unreachable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Repository answered success=false or an unexpected shape.
    #[error("Malformed repository response: {0}")]
    MalformedResponse(String),

    /// JSON serialization error on the request path.
    #[error("JSON error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Serialization(e.to_string())
    }
}
