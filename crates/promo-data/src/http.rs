//! HTTP implementation of the coupon repository.

use async_trait::async_trait;
use promo_core::coupon::Coupon;
use promo_core::ids::ProductId;
use promo_core::money::Money;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::RepositoryConfig;
use crate::envelope::{into_coupons, ApiEnvelope, ApplyData, CouponRecord};
use crate::error::FetchError;
use crate::repository::{
    ApplicableCoupons, CouponApplication, CouponRepository, CouponRequest, ServerValidation,
};

/// Repository client over JSON/REST.
///
/// Product display details are not part of the coupon routes; the catalog
/// cache enriches results through a `ProductDirectory` where one is
/// configured.
pub struct HttpCouponRepository {
    client: reqwest::Client,
    config: RepositoryConfig,
}

impl HttpCouponRepository {
    /// Build a client with the config's timeout baked in.
    pub fn new(config: RepositoryConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, e: reqwest::Error, url: &str) -> FetchError {
        if e.is_timeout() {
            warn!(url, timeout = ?self.config.timeout, "coupon repository call timed out");
            FetchError::Timeout(self.config.timeout)
        } else {
            warn!(url, error = %e, "coupon repository unreachable");
            FetchError::Connection(e.to_string())
        }
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and decode the standard envelope.
    ///
    /// The body is parsed even on non-2xx status: the repository answers
    /// declined validations with its normal envelope, and only an
    /// unreadable body falls back to a plain HTTP error.
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<ApiEnvelope<T>, FetchError> {
        debug!(url, "coupon repository request");
        let resp = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| self.transport_error(e, url))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| self.transport_error(e, url))?;

        match serde_json::from_slice::<ApiEnvelope<T>>(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => {
                warn!(url, error = %e, "unreadable repository response body");
                Err(FetchError::MalformedResponse(e.to_string()))
            }
            Err(_) => {
                warn!(url, status = status.as_u16(), "repository HTTP error");
                Err(FetchError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
        }
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiEnvelope<T>, FetchError> {
        let url = self.url(path);
        self.send_envelope(self.client.get(&url), &url).await
    }

    async fn post_envelope<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, FetchError> {
        let url = self.url(path);
        self.send_envelope(self.client.post(&url).json(body), &url)
            .await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductIdsBody<'a> {
    product_ids: &'a [ProductId],
}

#[async_trait]
impl CouponRepository for HttpCouponRepository {
    async fn active_coupons(&self) -> Result<Vec<Coupon>, FetchError> {
        let envelope: ApiEnvelope<Vec<CouponRecord>> =
            self.get_envelope("couponCodes/active/list").await?;
        into_coupons(envelope.into_data()?, self.config.currency)
    }

    async fn applicable_coupons(
        &self,
        product_ids: &[ProductId],
    ) -> Result<ApplicableCoupons, FetchError> {
        let envelope: ApiEnvelope<Vec<CouponRecord>> = self
            .post_envelope(
                "couponCodes/applicable-coupons",
                &ProductIdsBody { product_ids },
            )
            .await?;
        Ok(ApplicableCoupons {
            coupons: into_coupons(envelope.into_data()?, self.config.currency)?,
            products: HashMap::new(),
        })
    }

    async fn check_coupon(&self, req: &CouponRequest) -> Result<ServerValidation, FetchError> {
        let envelope: ApiEnvelope<CouponRecord> = self
            .post_envelope("couponCodes/check-coupon", req)
            .await?;
        // A declined check is a verdict, not a transport failure.
        if !envelope.success {
            return Ok(ServerValidation::Invalid {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Coupon was declined".to_string()),
            });
        }
        let coupon = envelope.into_data()?.into_coupon(self.config.currency)?;
        Ok(ServerValidation::Valid { coupon })
    }

    async fn apply_coupon(&self, req: &CouponRequest) -> Result<CouponApplication, FetchError> {
        let envelope: ApiEnvelope<ApplyData> = self
            .post_envelope("couponCodes/apply-coupon", req)
            .await?;
        let data = envelope.into_data()?;
        Ok(CouponApplication {
            discount_amount: Money::from_decimal(data.discount_amount, self.config.currency),
            coupon: data.coupon_details.into_coupon(self.config.currency)?,
        })
    }
}
