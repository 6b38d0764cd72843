//! Coupon repository access for the promo engine.
//!
//! Defines the [`CouponRepository`] and [`ProductDirectory`] seams, the
//! repository's JSON wire shapes, and an HTTP implementation over
//! `reqwest` with a bounded timeout (10 s by default).
//!
//! # Example
//!
//! ```rust,no_run
//! use promo_data::{HttpCouponRepository, RepositoryConfig};
//! use promo_data::repository::CouponRepository;
//!
//! # async fn run() -> Result<(), promo_data::FetchError> {
//! let repo = HttpCouponRepository::new(RepositoryConfig::new(
//!     "https://shop.example.com/api",
//! ))?;
//! let coupons = repo.active_coupons().await?;
//! println!("{} active coupons", coupons.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod repository;

pub use config::{RepositoryConfig, DEFAULT_TIMEOUT};
pub use error::FetchError;
pub use http::HttpCouponRepository;
pub use repository::{
    ApplicableCoupons, CouponApplication, CouponRepository, CouponRequest, ProductDirectory,
    ServerValidation,
};
