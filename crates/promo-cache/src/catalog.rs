//! Session-scoped coupon catalog cache.
//!
//! Caches repository results per canonicalized product-id-set key so a
//! render cycle never issues redundant network calls. Two concurrency
//! rules hold:
//!
//! - at most one fetch is in flight per key; concurrent callers for the
//!   same key await the first fetch's outcome instead of issuing a
//!   duplicate call
//! - a fetch that completes after [`CouponCatalogCache::invalidate`] was
//!   called still answers its waiters but is not written into the cache,
//!   so a superseded response can never overwrite newer state

use std::collections::HashMap;
use std::sync::Arc;

use promo_core::catalog::ProductDetail;
use promo_core::coupon::{Coupon, CouponScope};
use promo_core::ids::ProductId;
use promo_data::{ApplicableCoupons, CouponRepository, ProductDirectory};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::key::ProductSetKey;

/// A cached catalog result. On fetch failure the coupon list is empty and
/// `error` describes why; stale and fresh data are never mixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    /// Coupons in catalog order.
    pub coupons: Vec<Coupon>,
    /// Display details for products referenced by matched coupon scopes.
    pub products: HashMap<ProductId, ProductDetail>,
    /// Set when the fetch degraded to an empty result.
    pub error: Option<CatalogError>,
}

impl CatalogView {
    fn degraded(error: CatalogError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Whether this view stands in for a failed fetch.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// What the cache stores a result under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    ActiveList,
    ProductSet(ProductSetKey),
}

struct CacheState {
    /// Bumped on invalidation; completions under an older generation are
    /// not written back.
    generation: u64,
    ready: HashMap<CacheKey, CatalogView>,
    in_flight: HashMap<CacheKey, watch::Receiver<Option<CatalogView>>>,
}

/// Read-through cache in front of the coupon repository.
///
/// Owned by a single session/component scope; results are cloned out and
/// fetched coupon records are never mutated.
pub struct CouponCatalogCache {
    repo: Arc<dyn CouponRepository>,
    directory: Option<Arc<dyn ProductDirectory>>,
    state: Mutex<CacheState>,
}

impl CouponCatalogCache {
    pub fn new(repo: Arc<dyn CouponRepository>) -> Self {
        Self {
            repo,
            directory: None,
            state: Mutex::new(CacheState {
                generation: 0,
                ready: HashMap::new(),
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Attach a product directory for display enrichment of coupon scopes.
    pub fn with_directory(mut self, directory: Arc<dyn ProductDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// The currently active coupon set. An empty list is a valid cached
    /// answer, not an error.
    pub async fn active_coupons(&self) -> CatalogView {
        self.get(CacheKey::ActiveList).await
    }

    /// Coupons applicable to the given product set, plus display details
    /// for products their scopes reference. An empty input short-circuits
    /// to an empty view without touching the network.
    pub async fn applicable_coupons(
        &self,
        product_ids: impl IntoIterator<Item = ProductId>,
    ) -> CatalogView {
        let key = ProductSetKey::new(product_ids);
        if key.is_empty() {
            return CatalogView::default();
        }
        self.get(CacheKey::ProductSet(key)).await
    }

    /// Drop all cached entries and supersede any in-flight fetches. Their
    /// waiters still receive results; the cache does not.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.ready.clear();
        state.in_flight.clear();
    }

    async fn get(&self, key: CacheKey) -> CatalogView {
        // Decide under the lock whether we are the leader for this key.
        let (leader, generation) = {
            let mut state = self.state.lock().await;
            if let Some(view) = state.ready.get(&key) {
                return view.clone();
            }
            if let Some(rx) = state.in_flight.get(&key) {
                (Err(rx.clone()), state.generation)
            } else {
                let (tx, rx) = watch::channel(None);
                state.in_flight.insert(key.clone(), rx);
                (Ok(tx), state.generation)
            }
        };

        match leader {
            Ok(tx) => self.fetch_and_publish(key, generation, tx).await,
            Err(rx) => Self::await_leader(rx).await,
        }
    }

    /// Follower path: wait for the leader's fetch to publish.
    async fn await_leader(mut rx: watch::Receiver<Option<CatalogView>>) -> CatalogView {
        loop {
            if let Some(view) = rx.borrow_and_update().as_ref() {
                return view.clone();
            }
            if rx.changed().await.is_err() {
                // Leader dropped without publishing.
                return CatalogView::degraded(CatalogError::Network(
                    "coupon fetch was abandoned".to_string(),
                ));
            }
        }
    }

    /// Leader path: perform the fetch, publish to waiters, and write back
    /// unless the generation moved while we were out.
    async fn fetch_and_publish(
        &self,
        key: CacheKey,
        generation: u64,
        tx: watch::Sender<Option<CatalogView>>,
    ) -> CatalogView {
        let view = self.fetch(&key).await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(&key);
        if state.generation == generation {
            state.ready.insert(key, view.clone());
        } else {
            debug!(generation, "discarding superseded coupon fetch result");
        }
        drop(state);

        let _ = tx.send(Some(view.clone()));
        view
    }

    async fn fetch(&self, key: &CacheKey) -> CatalogView {
        let result = match key {
            CacheKey::ActiveList => self.repo.active_coupons().await.map(|coupons| {
                ApplicableCoupons {
                    coupons,
                    products: HashMap::new(),
                }
            }),
            CacheKey::ProductSet(set) => self.repo.applicable_coupons(set.ids()).await,
        };

        match result {
            Ok(applicable) => {
                let mut view = CatalogView {
                    coupons: applicable.coupons,
                    products: applicable.products,
                    error: None,
                };
                self.enrich(&mut view).await;
                view
            }
            Err(e) => {
                warn!(error = %e, "coupon fetch degraded to empty result");
                CatalogView::degraded(e.into())
            }
        }
    }

    /// Resolve display details for products referenced by coupon scopes.
    /// Lookup failures are non-fatal; enrichment never blocks a result.
    async fn enrich(&self, view: &mut CatalogView) {
        let Some(directory) = &self.directory else {
            return;
        };

        let mut wanted: Vec<ProductId> = Vec::new();
        for coupon in &view.coupons {
            if let CouponScope::Product { id, .. } = &coupon.scope {
                wanted.push(id.clone());
            }
            wanted.extend(coupon.extra_product_ids.iter().cloned());
        }
        wanted.sort();
        wanted.dedup();

        for id in wanted {
            if view.products.contains_key(&id) {
                continue;
            }
            match directory.product_detail(&id).await {
                Ok(Some(detail)) => {
                    view.products.insert(id, detail);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(product = %id, error = %e, "product detail lookup failed");
                }
            }
        }
    }
}
