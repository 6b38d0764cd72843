//! Canonical cache keys for product-id sets.

use std::fmt;

use promo_core::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product-id set in canonical form: sorted and de-duplicated, so the
/// same set keys the same cache slot regardless of the order the caller
/// assembled it in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductSetKey(Vec<ProductId>);

impl ProductSetKey {
    /// Canonicalize a collection of product ids.
    pub fn new(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut ids: Vec<ProductId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self(ids)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The canonicalized ids.
    pub fn ids(&self) -> &[ProductId] {
        &self.0
    }
}

impl fmt::Display for ProductSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
