//! Memoized filter results using moka
//!
//! Entries are keyed by dataset generation, so a reload never serves a view
//! computed over stale rows.

use crate::filter::{apply, FilterSpec};
use moka::future::Cache;
use olist_model::{Dataset, View};
use std::sync::Arc;
use std::time::Duration;
use ulid::Ulid;

/// Default number of distinct filter results kept
pub const DEFAULT_VIEW_CAPACITY: u64 = 256;

type ViewKey = (Ulid, FilterSpec);

/// Concurrent cache of filtered views
#[derive(Debug, Clone)]
pub struct ViewCache {
    inner: Cache<ViewKey, Arc<View>>,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CAPACITY)
    }
}

impl ViewCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache whose entries also expire after `ttl`
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Filtered view of `dataset`, computed at most once per generation and spec
    pub async fn filtered(&self, dataset: &Arc<Dataset>, spec: &FilterSpec) -> Arc<View> {
        let key = (dataset.generation(), spec.clone());
        self.inner
            .get_with(key, async { Arc::new(apply(dataset, spec)) })
            .await
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of entries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
