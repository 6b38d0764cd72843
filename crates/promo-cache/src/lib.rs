//! Coupon catalog caching for the promo engine.
//!
//! A session-scoped, read-through cache over the coupon repository:
//! canonicalized product-id-set keys, per-key request de-duplication,
//! generation tokens that discard superseded responses, and degradation
//! of transport failures into empty results with a side-channel error.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use promo_cache::CouponCatalogCache;
//! use promo_core::ids::ProductId;
//! use promo_data::{HttpCouponRepository, RepositoryConfig};
//!
//! # async fn run() -> Result<(), promo_data::FetchError> {
//! let repo = HttpCouponRepository::new(RepositoryConfig::new(
//!     "https://shop.example.com/api",
//! ))?;
//! let cache = CouponCatalogCache::new(Arc::new(repo));
//!
//! let view = cache
//!     .applicable_coupons(vec![ProductId::new("p1"), ProductId::new("p2")])
//!     .await;
//! if let Some(error) = &view.error {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod key;

pub use catalog::{CatalogView, CouponCatalogCache};
pub use error::CatalogError;
pub use key::ProductSetKey;
