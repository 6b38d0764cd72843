//! Repository and directory seams.
//!
//! `CouponRepository` is the system of record for coupon definitions;
//! this client performs pre-validation and presentation, while the
//! authoritative ledger mutation stays server-side behind
//! `apply_coupon`. `ProductDirectory` resolves product ids to display
//! metadata for enrichment.

use std::collections::HashMap;

use async_trait::async_trait;
use promo_core::catalog::ProductDetail;
use promo_core::coupon::Coupon;
use promo_core::ids::ProductId;
use promo_core::money::Money;
use promo_core::validator::RejectionReason;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Coupons applicable to a product set, with display details for any
/// product a matched coupon's scope references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicableCoupons {
    pub coupons: Vec<Coupon>,
    pub products: HashMap<ProductId, ProductDetail>,
}

/// A check/apply request as the repository expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    pub coupon_code: String,
    /// Decimal major units, the repository's own amount convention.
    pub purchase_amount: f64,
    pub product_ids: Vec<ProductId>,
}

impl CouponRequest {
    pub fn new(code: impl Into<String>, amount: Money, product_ids: Vec<ProductId>) -> Self {
        Self {
            coupon_code: code.into(),
            purchase_amount: amount.to_decimal(),
            product_ids,
        }
    }
}

/// Outcome of the side-effect-free server check.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerValidation {
    /// The repository accepted the code.
    Valid { coupon: Coupon },
    /// The repository declined with a message.
    Invalid { message: String },
}

impl ServerValidation {
    /// Map a declined check into the client rejection taxonomy. The
    /// server's free-text verdict is surfaced as-is; it never crashes
    /// presentation.
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            ServerValidation::Valid { .. } => None,
            ServerValidation::Invalid { message } => {
                Some(RejectionReason::MalformedServerResponse(message.clone()))
            }
        }
    }
}

/// Result of the authoritative apply call.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponApplication {
    pub coupon: Coupon,
    pub discount_amount: Money,
}

/// The coupon repository service, reachable over HTTP in production.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// All currently active coupons. Empty is a valid answer, not an error.
    async fn active_coupons(&self) -> Result<Vec<Coupon>, FetchError>;

    /// Coupons applicable to the given product set.
    async fn applicable_coupons(
        &self,
        product_ids: &[ProductId],
    ) -> Result<ApplicableCoupons, FetchError>;

    /// Side-effect-free pre-validation of a code.
    async fn check_coupon(&self, req: &CouponRequest) -> Result<ServerValidation, FetchError>;

    /// Authoritative application; the server owns redemption guarantees.
    async fn apply_coupon(&self, req: &CouponRequest) -> Result<CouponApplication, FetchError>;
}

/// Resolves product identifiers to display metadata.
#[async_trait]
pub trait ProductDirectory: Send + Sync {
    /// Display detail for one product, `None` when unknown.
    async fn product_detail(&self, id: &ProductId) -> Result<Option<ProductDetail>, FetchError>;
}
