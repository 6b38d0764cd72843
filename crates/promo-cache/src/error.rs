//! Side-channel error descriptions for degraded catalog results.

use std::time::Duration;

use promo_data::FetchError;
use thiserror::Error;

/// Why a catalog fetch degraded to an empty result. Carried alongside the
/// (empty) result rather than thrown into the caller's render path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Repository unreachable or answered with an HTTP error.
    #[error("Could not reach the coupon service")]
    Network(String),

    /// Repository too slow.
    #[error("The coupon service took too long to respond")]
    Timeout(Duration),

    /// Repository answered with an unexpected shape.
    #[error("The coupon service returned an unexpected response")]
    Malformed(String),
}

impl From<FetchError> for CatalogError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Timeout(d) => CatalogError::Timeout(d),
            FetchError::Http { status, url } => {
                CatalogError::Network(format!("HTTP {status} for {url}"))
            }
            FetchError::Connection(msg) => CatalogError::Network(msg),
            FetchError::MalformedResponse(msg) | FetchError::Serialization(msg) => {
                CatalogError::Malformed(msg)
            }
        }
    }
}
