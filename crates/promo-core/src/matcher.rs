//! Applicability matching between coupons and products.
//!
//! Matching is a union of conditions, not a precedence chain: a coupon
//! applies to a product if ANY of its grants covers it, and every matching
//! coupon is returned. Results follow catalog order; no priority ordering
//! exists between matched coupons and callers must not assume one.

use crate::catalog::ProductRef;
use crate::coupon::{Coupon, CouponScope};

/// Whether a single coupon covers a single product.
pub fn coupon_matches(coupon: &Coupon, product: &ProductRef) -> bool {
    if coupon.extra_product_ids.contains(&product.id) {
        return true;
    }
    if let Some(sub) = &product.sub_category_id {
        if coupon.extra_sub_category_ids.contains(sub) {
            return true;
        }
    }
    match &coupon.scope {
        CouponScope::AllProducts => true,
        CouponScope::Product { id, .. } => *id == product.id,
        CouponScope::Category { id, .. } => product.category_id.as_ref() == Some(id),
        CouponScope::SubCategory { id, .. } => product.sub_category_id.as_ref() == Some(id),
    }
}

/// Whether a coupon covers at least one product in the purchase.
pub fn coupon_matches_any(coupon: &Coupon, products: &[ProductRef]) -> bool {
    products.iter().any(|p| coupon_matches(coupon, p))
}

/// All coupons from `catalog` that cover at least one of `products`,
/// in catalog order. Pure: identical inputs always yield identical
/// ordered results.
pub fn matching_coupons<'a>(catalog: &'a [Coupon], products: &[ProductRef]) -> Vec<&'a Coupon> {
    catalog
        .iter()
        .filter(|c| coupon_matches_any(c, products))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::DiscountValue;
    use crate::ids::{CouponId, ProductId};
    use crate::money::{Currency, Money};
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    fn coupon(code: &str, scope: CouponScope) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new(code.to_lowercase()),
            code: code.to_string(),
            description: None,
            value: DiscountValue::Percentage(10.0),
            scope,
            extra_product_ids: HashSet::new(),
            extra_sub_category_ids: HashSet::new(),
            minimum_purchase: Money::zero(Currency::INR),
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
        }
    }

    fn in_category(product: &str, category: &str) -> ProductRef {
        ProductRef::bare(product).with_category(category)
    }

    #[test]
    fn test_all_products_matches_everything() {
        let c = coupon("ALL", CouponScope::AllProducts);
        assert!(coupon_matches(&c, &ProductRef::bare("anything")));
    }

    #[test]
    fn test_product_scope_exact_id() {
        let c = coupon(
            "ONE",
            CouponScope::Product {
                id: ProductId::new("p1"),
                name: None,
            },
        );
        assert!(coupon_matches(&c, &ProductRef::bare("p1")));
        assert!(!coupon_matches(&c, &ProductRef::bare("p2")));
    }

    #[test]
    fn test_category_scope_matches_without_direct_grant() {
        let c = coupon(
            "CAT",
            CouponScope::Category {
                id: "electronics".into(),
                name: None,
            },
        );
        // Product id absent from any grant list; category membership alone
        // is enough.
        assert!(coupon_matches(&c, &in_category("p9", "electronics")));
        assert!(!coupon_matches(&c, &in_category("p9", "apparel")));
    }

    #[test]
    fn test_extra_grant_overrides_narrow_scope() {
        let mut c = coupon(
            "MIX",
            CouponScope::Category {
                id: "apparel".into(),
                name: None,
            },
        );
        c.extra_product_ids.insert(ProductId::new("p1"));
        // p1 is not in apparel but is directly granted.
        assert!(coupon_matches(&c, &in_category("p1", "electronics")));
    }

    #[test]
    fn test_subcategory_grant_matches_outside_scope_category() {
        let mut c = coupon(
            "BOTH",
            CouponScope::Category {
                id: "electronics".into(),
                name: None,
            },
        );
        c.extra_sub_category_ids.insert("gaming-mice".into());
        // The product sits in a different category entirely; its
        // subcategory grant still covers it.
        let p = ProductRef::bare("p5")
            .with_category("apparel")
            .with_sub_category("gaming-mice");
        assert!(coupon_matches(&c, &p));
        // A subcategory-less sibling in that category does not match.
        assert!(!coupon_matches(&c, &in_category("p6", "apparel")));
    }

    #[test]
    fn test_unplaced_product_misses_category_scope() {
        let c = coupon(
            "CAT",
            CouponScope::Category {
                id: "electronics".into(),
                name: None,
            },
        );
        assert!(!coupon_matches(&c, &ProductRef::bare("p1")));
    }

    #[test]
    fn test_matching_preserves_catalog_order() {
        let catalog = vec![
            coupon("B", CouponScope::AllProducts),
            coupon(
                "A",
                CouponScope::Product {
                    id: ProductId::new("p1"),
                    name: None,
                },
            ),
            coupon(
                "C",
                CouponScope::Category {
                    id: "other".into(),
                    name: None,
                },
            ),
        ];
        let products = vec![ProductRef::bare("p1")];
        let matched = matching_coupons(&catalog, &products);
        let codes: Vec<_> = matched.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A"]);
    }

    #[test]
    fn test_matching_is_idempotent() {
        let catalog = vec![
            coupon("ALL", CouponScope::AllProducts),
            coupon(
                "CAT",
                CouponScope::Category {
                    id: "electronics".into(),
                    name: None,
                },
            ),
        ];
        let products = vec![in_category("p1", "electronics"), ProductRef::bare("p2")];
        let first: Vec<_> = matching_coupons(&catalog, &products)
            .iter()
            .map(|c| c.code.clone())
            .collect();
        let second: Vec<_> = matching_coupons(&catalog, &products)
            .iter()
            .map(|c| c.code.clone())
            .collect();
        assert_eq!(first, second);
    }
}
