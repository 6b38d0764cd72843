//! Coupon definition and eligibility scope.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discount::DiscountValue;
use crate::ids::{CategoryId, CouponId, ProductId, SubCategoryId};
use crate::money::Money;

/// The slice of the catalog a coupon is eligible against.
///
/// Display names are denormalized onto the scope once resolved so the UI
/// can render "20% off Electronics" without a second lookup; they play no
/// part in matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CouponScope {
    /// Valid for every product.
    AllProducts,
    /// Valid for one product.
    Product {
        id: ProductId,
        name: Option<String>,
    },
    /// Valid for a whole category.
    Category {
        id: CategoryId,
        name: Option<String>,
    },
    /// Valid for a subcategory.
    SubCategory {
        id: SubCategoryId,
        name: Option<String>,
    },
}

/// Derived validity status, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CouponStatus {
    Active,
    Expired,
    NotYetStarted,
}

/// A promotional code definition, immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub id: CouponId,
    /// Code as entered at checkout; canonical form is uppercase.
    pub code: String,
    /// Display description.
    pub description: Option<String>,
    /// Pricing rule.
    pub value: DiscountValue,
    /// Eligibility scope.
    pub scope: CouponScope,
    /// Direct product grants in addition to `scope`. The repository allows
    /// a coupon to name products, a category, and a subcategory at once;
    /// membership in any of them counts.
    pub extra_product_ids: HashSet<ProductId>,
    /// Subcategory grants in addition to `scope`, for records that declare
    /// a subcategory alongside the category holding the scope slot.
    pub extra_sub_category_ids: HashSet<SubCategoryId>,
    /// Purchase floor; zero means no floor.
    pub minimum_purchase: Money,
    /// Start of the validity window.
    pub starts_at: DateTime<Utc>,
    /// End of the validity window (inclusive).
    pub ends_at: DateTime<Utc>,
}

impl Coupon {
    /// Case-insensitive code comparison. Input is trimmed first, since it
    /// usually arrives straight from a text field.
    pub fn matches_code(&self, entered: &str) -> bool {
        self.code.to_uppercase() == entered.trim().to_uppercase()
    }

    /// Whether `now` falls within the validity window (inclusive bounds).
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }

    /// Derived status at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> CouponStatus {
        if now < self.starts_at {
            CouponStatus::NotYetStarted
        } else if now > self.ends_at {
            CouponStatus::Expired
        } else {
            CouponStatus::Active
        }
    }

    /// Display label for the discount (e.g., "20% OFF").
    pub fn label(&self) -> String {
        self.value.label()
    }
}
