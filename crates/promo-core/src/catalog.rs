//! Minimal product views the engine consumes.
//!
//! The engine never owns the product catalog; the storefront hands it the
//! identifiers it needs. `ProductRef` carries what matching requires,
//! `ProductDetail` carries what display enrichment requires.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, ProductId, SubCategoryId};

/// A named category or subcategory reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef<Id> {
    pub id: Id,
    pub name: String,
}

/// Matching input: a product id with its (possibly unresolved) placement
/// in the category tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRef {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubCategoryId>,
}

impl ProductRef {
    /// A product whose category placement is unknown. Still matches
    /// all-product and direct-grant coupons.
    pub fn bare(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            category_id: None,
            sub_category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_sub_category(mut self, sub_category_id: impl Into<SubCategoryId>) -> Self {
        self.sub_category_id = Some(sub_category_id.into());
        self
    }
}

/// Display enrichment for a product referenced by a coupon's scope.
/// Not used for matching correctness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub category: Option<CategoryRef<CategoryId>>,
    pub sub_category: Option<CategoryRef<SubCategoryId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_product_has_no_placement() {
        let p = ProductRef::bare("p1");
        assert_eq!(p.id.as_str(), "p1");
        assert!(p.category_id.is_none());
        assert!(p.sub_category_id.is_none());
    }

    #[test]
    fn test_builder_placement() {
        let p = ProductRef::bare("p1")
            .with_category("electronics")
            .with_sub_category("phones");
        assert_eq!(p.category_id.unwrap().as_str(), "electronics");
        assert_eq!(p.sub_category_id.unwrap().as_str(), "phones");
    }
}
