//! Coupon applicability and discount engine.
//!
//! Pure domain logic for deciding which promotional codes apply to a set
//! of catalog items, validating a code against a candidate purchase, and
//! computing the resulting discount:
//!
//! - **Coupon model**: typed IDs, money, scopes, validity windows
//! - **Matcher**: scope-union applicability between coupons and products
//! - **Validator**: ordered purchase-time checks with structured rejections
//! - **Session**: the single applied-coupon binding and its transitions
//!
//! Everything here is synchronous and deterministic; fetching and caching
//! live in `promo-data` and `promo-cache`.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use promo_core::prelude::*;
//!
//! # fn catalog() -> Vec<Coupon> { Vec::new() }
//! let ctx = PurchaseContext::new(
//!     Money::from_decimal(500.0, Currency::INR),
//!     vec![ProductRef::bare("P1")],
//! );
//!
//! match validate("SAVE20", &ctx, &catalog(), Utc::now()) {
//!     ApplicationResult::Accepted { discount, label, .. } => {
//!         println!("{} ({})", discount, label);
//!     }
//!     ApplicationResult::Rejected(reason) => {
//!         println!("{}", reason.user_message());
//!     }
//! }
//! ```

pub mod catalog;
pub mod coupon;
pub mod discount;
pub mod ids;
pub mod matcher;
pub mod money;
pub mod session;
pub mod validator;

pub use coupon::{Coupon, CouponScope, CouponStatus};
pub use discount::DiscountValue;
pub use ids::*;
pub use money::{Currency, Money};
pub use validator::{validate, ApplicationResult, PurchaseContext, RejectionReason};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{CategoryRef, ProductDetail, ProductRef};
    pub use crate::coupon::{Coupon, CouponScope, CouponStatus};
    pub use crate::discount::DiscountValue;
    pub use crate::ids::*;
    pub use crate::matcher::{coupon_matches, coupon_matches_any, matching_coupons};
    pub use crate::money::{Currency, Money};
    pub use crate::session::{AppliedCoupon, AppliedState, CouponSession, SessionEvent};
    pub use crate::validator::{
        validate, ApplicationResult, PurchaseContext, RejectionReason,
    };
}
