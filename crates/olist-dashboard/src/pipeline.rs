//! Startup pipeline and dashboard context
//!
//! ```text
//! connect (fatal) → seed (warn only) → DatasetCache → filter → aggregate
//! ```
//!
//! A [`Dashboard`] owns the one store handle of the process and the caches
//! built on it; every render goes through it.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::render::{render_view, FilterState, RenderOutcome};
use olist_analytics::{CacheStats, Clock, DatasetCache, ViewCache, DEFAULT_VIEW_CAPACITY};
use olist_model::{Dataset, FilterOptions};
use olist_store::{check_connection, connect, redact_uri, SeedOutcome, Seeder, SharedStore};
use std::sync::Arc;

/// Dashboard context: configuration, store handle and caches
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    store: SharedStore,
    datasets: DatasetCache,
    views: ViewCache,
}

impl Dashboard {
    /// Connect to the configured store and seed it if empty.
    ///
    /// Seeding problems are logged and returned, never raised.
    ///
    /// # Errors
    /// `DashboardError::Connection` if the store cannot be reached in time
    pub async fn open(config: DashboardConfig) -> DashboardResult<(Self, SeedOutcome)> {
        let store = connect(&config.connect_options()).await.map_err(|e| {
            tracing::error!(
                uri = %redact_uri(&config.store_uri),
                error = %e,
                "store unreachable; aborting"
            );
            DashboardError::Connection(e)
        })?;
        tracing::info!(uri = %store.display_uri(), database = %config.database, "connected to store");
        Ok(Self::start(config, store).await)
    }

    /// Same as [`Dashboard::open`] over an already constructed store.
    ///
    /// # Errors
    /// `DashboardError::Connection` if the store does not answer in time
    pub async fn open_with_store(
        config: DashboardConfig,
        store: SharedStore,
    ) -> DashboardResult<(Self, SeedOutcome)> {
        if let Err(e) = check_connection(store.as_ref(), config.server_selection_timeout()).await {
            tracing::error!(uri = %store.display_uri(), error = %e, "store unreachable; aborting");
            return Err(DashboardError::Connection(e));
        }
        Ok(Self::start(config, store).await)
    }

    async fn start(config: DashboardConfig, store: SharedStore) -> (Self, SeedOutcome) {
        let dashboard = Self::new(config, store);
        let outcome = dashboard.seed().await;
        (dashboard, outcome)
    }

    /// Build the context without connecting or seeding
    #[must_use]
    pub fn new(config: DashboardConfig, store: SharedStore) -> Self {
        let datasets =
            DatasetCache::new(Arc::clone(&store), config.collection.clone()).with_ttl(config.cache_ttl());
        let views = ViewCache::with_ttl(DEFAULT_VIEW_CAPACITY, config.cache_ttl());
        Self {
            config,
            store,
            datasets,
            views,
        }
    }

    /// With dataset cache time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.datasets = DatasetCache::new(Arc::clone(&self.store), self.config.collection.clone())
            .with_ttl(self.config.cache_ttl())
            .with_clock(clock);
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Import the seed file into an empty collection
    pub async fn seed(&self) -> SeedOutcome {
        let outcome = Seeder::new(self.config.collection.clone(), self.config.seed_path.clone())
            .ensure_seeded(self.store.as_ref())
            .await;
        if outcome.is_success() {
            tracing::info!(message = %outcome.message(), "seeding finished");
        } else {
            tracing::warn!(
                message = %outcome.message(),
                "seeding failed; continuing with current store contents"
            );
        }
        outcome
    }

    /// Cached dataset, reloaded once the TTL has passed
    ///
    /// # Errors
    /// `DashboardError::Analytics` if a reload is needed and the read fails
    pub async fn dataset(&self) -> DashboardResult<Arc<Dataset>> {
        Ok(self.datasets.get().await?)
    }

    /// Drop cached data so the next call reads the store again
    pub async fn refresh(&self) {
        self.datasets.invalidate().await;
        self.views.clear();
    }

    /// Selectable filter values
    ///
    /// # Errors
    /// `DashboardError::Analytics` if the dataset cannot be loaded
    pub async fn options(&self) -> DashboardResult<FilterOptions> {
        Ok(self.dataset().await?.options())
    }

    /// Render the dashboard for a filter selection
    ///
    /// # Errors
    /// `DashboardError::Analytics` if the dataset cannot be loaded
    pub async fn render(&self, state: &FilterState) -> DashboardResult<RenderOutcome> {
        let dataset = self.dataset().await?;
        let Some(spec) = state.resolve(&dataset) else {
            tracing::warn!(collection = %self.config.collection, "no orders to display");
            return Ok(RenderOutcome::EmptyDataset);
        };
        let view = self.views.filtered(&dataset, &spec).await;
        Ok(render_view(spec, &view, state.top_statuses))
    }

    /// Dataset cache hit/miss counters
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.datasets.stats()
    }
}
