//! Time-bounded dataset cache
//!
//! Holds the single materialized [`Dataset`] for the process. Within the TTL
//! every [`DatasetCache::get`] returns the same instance without touching the
//! store; after it, the next call reloads. Time comes from an injected
//! [`Clock`] so expiry can be driven deterministically.

use crate::error::AnalyticsResult;
use crate::loader::load_dataset;
use olist_model::Dataset;
use olist_store::SharedStore;
use parking_lot::Mutex as SyncMutex;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default time-to-live of a loaded dataset
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Monotonic time source
pub trait Clock: Send + Sync + Debug {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Arc<SyncMutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create clock frozen at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(SyncMutex::new(Duration::ZERO)),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls served from the cached dataset
    pub hits: u64,
    /// Calls that loaded from the store
    pub misses: u64,
}

#[derive(Debug)]
struct CachedDataset {
    dataset: Arc<Dataset>,
    loaded_at: Instant,
}

/// Single-entry dataset cache with TTL
#[derive(Debug)]
pub struct DatasetCache {
    store: SharedStore,
    collection: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CachedDataset>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DatasetCache {
    /// Create cache over `collection` with the default TTL and wall clock
    #[must_use]
    pub fn new(store: SharedStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            ttl: DEFAULT_TTL,
            clock: Arc::new(SystemClock),
            slot: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// With time-to-live
    #[inline]
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// With time source
    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configured time-to-live
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current dataset, reloading from the store once the TTL has elapsed.
    ///
    /// Concurrent callers during a reload wait for it instead of issuing their
    /// own read.
    ///
    /// # Errors
    /// `AnalyticsError::Store` if a reload is needed and the read fails; the
    /// expired entry is kept but not served.
    pub async fn get(&self) -> AnalyticsResult<Arc<Dataset>> {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref() {
            let age = now.saturating_duration_since(cached.loaded_at);
            if age < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(age_ms = u64::try_from(age.as_millis()).unwrap_or(u64::MAX), "dataset cache hit");
                return Ok(Arc::clone(&cached.dataset));
            }
            tracing::info!(ttl_secs = self.ttl.as_secs(), "dataset cache expired; reloading");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let dataset = Arc::new(load_dataset(self.store.as_ref(), &self.collection).await?);
        *slot = Some(CachedDataset {
            dataset: Arc::clone(&dataset),
            loaded_at: now,
        });
        Ok(dataset)
    }

    /// Drop the cached dataset; the next `get` reloads
    pub async fn invalidate(&self) {
        if self.slot.lock().await.take().is_some() {
            tracing::debug!("dataset cache invalidated");
        }
    }

    /// Hit/miss counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
