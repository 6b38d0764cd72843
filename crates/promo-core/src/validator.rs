//! Purchase-time coupon validation.
//!
//! Fully synchronous and deterministic: everything it needs arrives as
//! arguments, including `now`. Rejections are values, never errors, so
//! nothing here can throw into a render path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ProductRef;
use crate::coupon::Coupon;
use crate::matcher::coupon_matches_any;
use crate::money::Money;

/// The candidate purchase a coupon is validated against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseContext {
    /// Total purchase amount before discount.
    pub amount: Money,
    /// Products involved in the purchase.
    pub products: Vec<ProductRef>,
}

impl PurchaseContext {
    pub fn new(amount: Money, products: Vec<ProductRef>) -> Self {
        Self { amount, products }
    }
}

/// Why a coupon was rejected. Each variant renders as a short, actionable
/// user message; raw transport errors never reach this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
pub enum RejectionReason {
    /// Code does not match any active coupon (case-insensitive).
    #[error("Coupon code not found")]
    CouponNotFound,

    /// Code matches but the validity window has passed (or not opened).
    #[error("This coupon has expired")]
    CouponExpired,

    /// Code matches but no purchase item falls within its scope.
    #[error("This coupon is not applicable to the items in your cart")]
    CouponNotApplicable,

    /// Purchase amount below the coupon's floor.
    #[error("Minimum order {} required", required.display())]
    MinimumPurchaseNotMet {
        /// The coupon's purchase floor.
        required: Money,
        /// How much more must be added to qualify.
        shortfall: Money,
    },

    /// The repository answered success=false or an unreadable shape.
    #[error("{0}")]
    MalformedServerResponse(String),
}

impl RejectionReason {
    /// Short message suitable for direct display.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Outcome of one validate/apply attempt; consumed once by the UI and
/// discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ApplicationResult {
    /// Coupon accepted; carries everything downstream display needs.
    Accepted {
        coupon: Coupon,
        discount: Money,
        label: String,
    },
    /// Coupon rejected with a structured cause.
    Rejected(RejectionReason),
}

impl ApplicationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ApplicationResult::Accepted { .. })
    }

    /// The rejection cause, if any.
    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            ApplicationResult::Accepted { .. } => None,
            ApplicationResult::Rejected(reason) => Some(reason),
        }
    }

    /// The computed discount, present only when accepted.
    pub fn discount(&self) -> Option<Money> {
        match self {
            ApplicationResult::Accepted { discount, .. } => Some(*discount),
            ApplicationResult::Rejected(_) => None,
        }
    }
}

/// Validate a coupon code against a purchase. Checks run in a fixed order
/// and the first failure wins:
///
/// 1. code exists in the catalog (case-insensitive)
/// 2. validity window contains `now`
/// 3. at least one purchase product falls within the coupon's scope
/// 4. purchase amount meets the floor (non-strict)
pub fn validate(
    code: &str,
    ctx: &PurchaseContext,
    catalog: &[Coupon],
    now: DateTime<Utc>,
) -> ApplicationResult {
    let Some(coupon) = catalog.iter().find(|c| c.matches_code(code)) else {
        return ApplicationResult::Rejected(RejectionReason::CouponNotFound);
    };

    if !coupon.is_active(now) {
        return ApplicationResult::Rejected(RejectionReason::CouponExpired);
    }

    if !coupon_matches_any(coupon, &ctx.products) {
        return ApplicationResult::Rejected(RejectionReason::CouponNotApplicable);
    }

    if ctx.amount.amount_cents < coupon.minimum_purchase.amount_cents {
        return ApplicationResult::Rejected(RejectionReason::MinimumPurchaseNotMet {
            required: coupon.minimum_purchase,
            shortfall: coupon.minimum_purchase.saturating_sub(&ctx.amount),
        });
    }

    let discount = coupon.value.discount_for(ctx.amount);
    ApplicationResult::Accepted {
        label: coupon.label(),
        coupon: coupon.clone(),
        discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupon::CouponScope;
    use crate::discount::DiscountValue;
    use crate::ids::{CouponId, ProductId};
    use crate::money::Currency;
    use chrono::Duration;
    use std::collections::HashSet;

    fn inr(cents: i64) -> Money {
        Money::new(cents, Currency::INR)
    }

    fn coupon(code: &str, value: DiscountValue, scope: CouponScope, floor_cents: i64) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new(code.to_lowercase()),
            code: code.to_string(),
            description: None,
            value,
            scope,
            extra_product_ids: HashSet::new(),
            extra_sub_category_ids: HashSet::new(),
            minimum_purchase: inr(floor_cents),
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
        }
    }

    fn save20() -> Coupon {
        coupon(
            "SAVE20",
            DiscountValue::Percentage(20.0),
            CouponScope::AllProducts,
            0,
        )
    }

    fn flat100() -> Coupon {
        coupon(
            "FLAT100",
            DiscountValue::Fixed(inr(10_000)),
            CouponScope::Product {
                id: ProductId::new("P1"),
                name: None,
            },
            20_000,
        )
    }

    fn ctx(amount_cents: i64, product: &str) -> PurchaseContext {
        PurchaseContext::new(inr(amount_cents), vec![ProductRef::bare(product)])
    }

    #[test]
    fn test_unknown_code() {
        let result = validate("NOPE", &ctx(50_000, "P1"), &[save20()], Utc::now());
        assert_eq!(result.rejection(), Some(&RejectionReason::CouponNotFound));
    }

    #[test]
    fn test_lowercase_code_accepted_with_computed_discount() {
        // SAVE20 (20%, all products) on a 500.00 cart: 100.00 off.
        let result = validate("save20", &ctx(50_000, "P2"), &[save20()], Utc::now());
        match result {
            ApplicationResult::Accepted {
                discount, label, ..
            } => {
                assert_eq!(discount.amount_cents, 10_000);
                assert_eq!(label, "20% OFF");
            }
            ApplicationResult::Rejected(reason) => panic!("rejected: {reason}"),
        }
    }

    #[test]
    fn test_expired_before_scope_check() {
        let mut c = save20();
        c.ends_at = Utc::now() - Duration::seconds(1);
        let result = validate("SAVE20", &ctx(50_000, "P1"), &[c], Utc::now());
        assert_eq!(result.rejection(), Some(&RejectionReason::CouponExpired));
    }

    #[test]
    fn test_expiry_one_second_margin() {
        let now = Utc::now();
        let mut c = save20();
        c.ends_at = now + Duration::seconds(1);
        let result = validate("SAVE20", &ctx(50_000, "P1"), &[c], now);
        assert!(result.is_accepted());
    }

    #[test]
    fn test_not_applicable_product() {
        // FLAT100 is scoped to P1; cart holds only P2.
        let result = validate("FLAT100", &ctx(30_000, "P2"), &[flat100()], Utc::now());
        assert_eq!(
            result.rejection(),
            Some(&RejectionReason::CouponNotApplicable)
        );
    }

    #[test]
    fn test_minimum_purchase_not_met_reports_shortfall() {
        // FLAT100 needs 200.00; cart totals 150.00 with the right product.
        let result = validate("FLAT100", &ctx(15_000, "P1"), &[flat100()], Utc::now());
        match result.rejection() {
            Some(RejectionReason::MinimumPurchaseNotMet {
                required,
                shortfall,
            }) => {
                assert_eq!(required.amount_cents, 20_000);
                assert_eq!(shortfall.amount_cents, 5_000);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_minimum_purchase_boundary() {
        // Equal to the floor: accepted (non-strict).
        let result = validate("FLAT100", &ctx(20_000, "P1"), &[flat100()], Utc::now());
        assert!(result.is_accepted());

        // One cent under: rejected.
        let result = validate("FLAT100", &ctx(19_999, "P1"), &[flat100()], Utc::now());
        assert!(matches!(
            result.rejection(),
            Some(RejectionReason::MinimumPurchaseNotMet { .. })
        ));
    }

    #[test]
    fn test_flat100_accepted_above_floor() {
        let result = validate("FLAT100", &ctx(25_000, "P1"), &[flat100()], Utc::now());
        assert_eq!(result.discount().map(|d| d.amount_cents), Some(10_000));
    }

    #[test]
    fn test_minimum_purchase_message_is_actionable() {
        let reason = RejectionReason::MinimumPurchaseNotMet {
            required: inr(50_000),
            shortfall: inr(10_000),
        };
        assert_eq!(reason.user_message(), "Minimum order \u{20b9}500.00 required");
    }
}
