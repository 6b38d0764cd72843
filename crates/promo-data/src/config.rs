//! Repository client configuration.

use std::time::Duration;

use promo_core::money::Currency;

/// Default bound on any single repository call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the HTTP coupon repository client.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Base URL of the repository service (no trailing slash required).
    pub base_url: String,
    /// Bound on any single call; elapsed requests resolve to a timeout
    /// error rather than hanging.
    pub timeout: Duration,
    /// Currency all repository amounts are denominated in.
    pub currency: Currency,
    /// Optional bearer token for authenticated routes.
    pub bearer_token: Option<String>,
}

impl RepositoryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            currency: Currency::default(),
            bearer_token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}
