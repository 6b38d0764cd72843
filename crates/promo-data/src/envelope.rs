//! Wire shapes for the coupon repository's JSON API.
//!
//! The repository answers every route with a `{success, message?, data?}`
//! envelope. Coupon records arrive flat, with the product/category/
//! subcategory grants as three independently optional fields; conversion
//! into the typed [`Coupon`] model is centralized here so the union
//! semantics live in exactly one reviewed place.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use promo_core::coupon::{Coupon, CouponScope};
use promo_core::discount::DiscountValue;
use promo_core::ids::CouponId;
use promo_core::money::{Currency, Money};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// The repository's standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success=false` or a missing body into
    /// a malformed-response error that carries the server message.
    pub fn into_data(self) -> Result<T, FetchError> {
        if !self.success {
            return Err(FetchError::MalformedResponse(
                self.message
                    .unwrap_or_else(|| "repository reported failure".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| FetchError::MalformedResponse("missing data field".to_string()))
    }
}

/// A category or subcategory reference as the repository sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A coupon record as stored by the repository.
///
/// `applicableProducts`, `applicableCategory`, and `applicableSubCategory`
/// are each optional and may appear together; membership in any of them
/// makes a product eligible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub coupon_code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "percentage" or "fixed".
    pub discount_type: String,
    pub discount_value: f64,
    #[serde(default)]
    pub applicable_products: Vec<String>,
    #[serde(default)]
    pub applicable_category: Option<NamedRef>,
    #[serde(default)]
    pub applicable_sub_category: Option<NamedRef>,
    #[serde(default)]
    pub minimum_purchase_amount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl CouponRecord {
    /// Convert the flat record into the typed coupon model.
    ///
    /// Scope resolution: a category grant wins the scope slot, then a
    /// subcategory grant, then a single product grant; with no grants at
    /// all the coupon covers every product. Grants that lose the scope
    /// slot are not dropped: product grants always land in
    /// `extra_product_ids` and a subcategory declared alongside a
    /// category lands in `extra_sub_category_ids`, so a record declaring
    /// several kinds of grant keeps its union semantics even when the
    /// subcategory does not sit under the declared category.
    pub fn into_coupon(self, currency: Currency) -> Result<Coupon, FetchError> {
        if self.discount_value < 0.0 {
            return Err(FetchError::MalformedResponse(format!(
                "negative discount value on coupon {}",
                self.coupon_code
            )));
        }
        let value = match self.discount_type.as_str() {
            "percentage" => DiscountValue::Percentage(self.discount_value),
            "fixed" => DiscountValue::Fixed(Money::from_decimal(self.discount_value, currency)),
            other => {
                return Err(FetchError::MalformedResponse(format!(
                    "unknown discount type '{other}' on coupon {}",
                    self.coupon_code
                )))
            }
        };

        let extra_product_ids: HashSet<_> = self
            .applicable_products
            .iter()
            .map(|p| p.as_str().into())
            .collect();

        let mut extra_sub_category_ids = HashSet::new();
        let scope = if let Some(cat) = self.applicable_category {
            if let Some(sub) = self.applicable_sub_category {
                extra_sub_category_ids.insert(sub.id.into());
            }
            CouponScope::Category {
                id: cat.id.into(),
                name: cat.name,
            }
        } else if let Some(sub) = self.applicable_sub_category {
            CouponScope::SubCategory {
                id: sub.id.into(),
                name: sub.name,
            }
        } else if self.applicable_products.len() == 1 {
            CouponScope::Product {
                id: self.applicable_products[0].as_str().into(),
                name: None,
            }
        } else if self.applicable_products.is_empty() {
            CouponScope::AllProducts
        } else {
            // Several direct grants, no category: the grants set alone
            // defines eligibility.
            CouponScope::Product {
                id: self.applicable_products[0].as_str().into(),
                name: None,
            }
        };

        Ok(Coupon {
            id: CouponId::new(self.id),
            code: self.coupon_code.trim().to_uppercase(),
            description: self.description,
            value,
            scope,
            extra_product_ids,
            extra_sub_category_ids,
            minimum_purchase: Money::from_decimal(self.minimum_purchase_amount, currency),
            starts_at: self.start_date,
            ends_at: self.end_date,
        })
    }
}

/// Payload of a successful apply call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyData {
    pub coupon_details: CouponRecord,
    pub discount_amount: f64,
}

/// Convert a batch of records, failing on the first malformed one.
pub fn into_coupons(
    records: Vec<CouponRecord>,
    currency: Currency,
) -> Result<Vec<Coupon>, FetchError> {
    records
        .into_iter()
        .map(|r| r.into_coupon(currency))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::catalog::ProductRef;
    use promo_core::matcher::coupon_matches;

    fn record_json(extra: &str) -> String {
        format!(
            r#"{{
                "_id": "64ab",
                "couponCode": "save20",
                "discountType": "percentage",
                "discountValue": 20,
                "startDate": "2026-01-01T00:00:00Z",
                "endDate": "2026-12-31T23:59:59Z"
                {extra}
            }}"#
        )
    }

    #[test]
    fn test_envelope_success_with_data() {
        let env: ApiEnvelope<Vec<i32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let env: ApiEnvelope<Vec<i32>> =
            serde_json::from_str(r#"{"success": false, "message": "Coupon expired"}"#).unwrap();
        match env.into_data() {
            Err(FetchError::MalformedResponse(msg)) => assert_eq!(msg, "Coupon expired"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_success_without_data_is_malformed() {
        let env: ApiEnvelope<Vec<i32>> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            env.into_data(),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_record_code_canonicalized_uppercase() {
        let record: CouponRecord = serde_json::from_str(&record_json("")).unwrap();
        let coupon = record.into_coupon(Currency::INR).unwrap();
        assert_eq!(coupon.code, "SAVE20");
        assert_eq!(coupon.scope, CouponScope::AllProducts);
        assert_eq!(coupon.value, DiscountValue::Percentage(20.0));
    }

    #[test]
    fn test_record_with_category_scope() {
        let record: CouponRecord = serde_json::from_str(&record_json(
            r#", "applicableCategory": {"_id": "cat1", "name": "Electronics"}"#,
        ))
        .unwrap();
        let coupon = record.into_coupon(Currency::INR).unwrap();
        match &coupon.scope {
            CouponScope::Category { id, name } => {
                assert_eq!(id.as_str(), "cat1");
                assert_eq!(name.as_deref(), Some("Electronics"));
            }
            other => panic!("unexpected scope: {other:?}"),
        }
    }

    #[test]
    fn test_record_with_simultaneous_grants_keeps_union() {
        let record: CouponRecord = serde_json::from_str(&record_json(
            r#", "applicableCategory": {"_id": "cat1", "name": "Electronics"},
                "applicableProducts": ["p7", "p8"]"#,
        ))
        .unwrap();
        let coupon = record.into_coupon(Currency::INR).unwrap();

        // Category membership matches.
        assert!(coupon_matches(
            &coupon,
            &ProductRef::bare("px").with_category("cat1")
        ));
        // Direct grants outside the category still match.
        assert!(coupon_matches(&coupon, &ProductRef::bare("p7")));
        assert!(coupon_matches(&coupon, &ProductRef::bare("p8")));
        // Unrelated products do not.
        assert!(!coupon_matches(&coupon, &ProductRef::bare("p9")));
    }

    #[test]
    fn test_record_with_category_and_subcategory_keeps_both_grants() {
        let record: CouponRecord = serde_json::from_str(&record_json(
            r#", "applicableCategory": {"_id": "cat1", "name": "Electronics"},
                "applicableSubCategory": {"_id": "sub9", "name": "Gaming Mice"}"#,
        ))
        .unwrap();
        let coupon = record.into_coupon(Currency::INR).unwrap();
        assert!(matches!(coupon.scope, CouponScope::Category { .. }));

        // The subcategory grant survives even for a product placed under a
        // different category, so inconsistent records keep their reach.
        let by_sub = ProductRef::bare("p1")
            .with_category("cat2")
            .with_sub_category("sub9");
        assert!(coupon_matches(&coupon, &by_sub));
        // Category membership matches as before.
        assert!(coupon_matches(
            &coupon,
            &ProductRef::bare("p2").with_category("cat1")
        ));
        // Neither grant covers this one.
        assert!(!coupon_matches(
            &coupon,
            &ProductRef::bare("p3").with_category("cat2")
        ));
    }

    #[test]
    fn test_record_fixed_discount_and_floor() {
        let record: CouponRecord = serde_json::from_str(
            r#"{
                "_id": "64ac",
                "couponCode": "FLAT100",
                "discountType": "fixed",
                "discountValue": 100,
                "minimumPurchaseAmount": 200,
                "applicableProducts": ["P1"],
                "startDate": "2026-01-01T00:00:00Z",
                "endDate": "2026-12-31T23:59:59Z"
            }"#,
        )
        .unwrap();
        let coupon = record.into_coupon(Currency::INR).unwrap();
        assert_eq!(
            coupon.value,
            DiscountValue::Fixed(Money::from_decimal(100.0, Currency::INR))
        );
        assert_eq!(coupon.minimum_purchase.amount_cents, 20_000);
        assert!(matches!(coupon.scope, CouponScope::Product { .. }));
    }

    #[test]
    fn test_negative_discount_value_is_malformed() {
        let record: CouponRecord = serde_json::from_str(
            &record_json("").replace(r#""discountValue": 20"#, r#""discountValue": -20"#),
        )
        .unwrap();
        assert!(matches!(
            record.into_coupon(Currency::INR),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unknown_discount_type_is_malformed() {
        let record: CouponRecord = serde_json::from_str(
            &record_json("").replace("percentage", "bogo"),
        )
        .unwrap();
        assert!(matches!(
            record.into_coupon(Currency::INR),
            Err(FetchError::MalformedResponse(_))
        ));
    }
}
