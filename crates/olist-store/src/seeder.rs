//! Idempotent first-run seeding
//!
//! The seeder only checks whether the collection is empty. Partial or stale
//! contents are left alone, and two processes racing on an empty store may
//! both insert: no lock or unique index on `order_id` is taken.

use crate::client::DocumentStore;
use crate::error::SeedError;
use crate::source::SeedFile;
use std::path::PathBuf;

/// Result of a seeding attempt; never an error
#[derive(Debug)]
pub enum SeedOutcome {
    /// Collection already had documents; nothing was written
    AlreadyPopulated { count: u64 },
    /// Collection was empty and has been filled from the seed file
    Seeded { inserted: usize, rejected: usize },
    /// Seeding failed; the store is left as it was
    Failed(SeedError),
}

impl SeedOutcome {
    /// Check if the store is usable as far as seeding is concerned
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Human readable summary
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::AlreadyPopulated { count } => {
                format!("database already populated ({count} documents); nothing to import")
            }
            Self::Seeded { inserted, rejected: 0 } => {
                format!("imported {inserted} documents from the seed file into the store")
            }
            Self::Seeded { inserted, rejected } => format!(
                "imported {inserted} documents from the seed file into the store ({rejected} rows skipped)"
            ),
            Self::Failed(SeedError::FileMissing(path)) => format!(
                "seed file not found at {} for the initial load",
                path.display()
            ),
            Self::Failed(e) => format!("failed to populate the database: {e}"),
        }
    }

    /// The `(success, message)` pair shown to users
    #[must_use]
    pub fn into_pair(self) -> (bool, String) {
        (self.is_success(), self.message())
    }
}

/// Seeds one collection from one seed file
#[derive(Debug, Clone)]
pub struct Seeder {
    collection: String,
    source: SeedFile,
}

impl Seeder {
    /// Create seeder
    #[must_use]
    pub fn new(collection: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            collection: collection.into(),
            source: SeedFile::new(source_path),
        }
    }

    /// Target collection
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fill the collection from the seed file if, and only if, it is empty.
    ///
    /// Safe to run on every startup. All failures are folded into
    /// [`SeedOutcome::Failed`].
    pub async fn ensure_seeded(&self, store: &dyn DocumentStore) -> SeedOutcome {
        match self.try_seed(store).await {
            Ok(outcome) => {
                tracing::info!(collection = %self.collection, "{}", outcome.message());
                outcome
            }
            Err(e) => {
                let outcome = SeedOutcome::Failed(e);
                tracing::warn!(collection = %self.collection, "{}", outcome.message());
                outcome
            }
        }
    }

    async fn try_seed(&self, store: &dyn DocumentStore) -> Result<SeedOutcome, SeedError> {
        let count = store.count(&self.collection).await?;
        if count > 0 {
            return Ok(SeedOutcome::AlreadyPopulated { count });
        }

        tracing::info!(
            collection = %self.collection,
            path = %self.source.path().display(),
            "collection empty; loading seed file"
        );
        let batch = self.source.read().await?;
        if batch.records.is_empty() {
            return Ok(SeedOutcome::Seeded {
                inserted: 0,
                rejected: batch.rejected,
            });
        }

        let inserted = store
            .insert_many(&self.collection, batch.records)
            .await
            .map_err(SeedError::Write)?;

        Ok(SeedOutcome::Seeded {
            inserted,
            rejected: batch.rejected,
        })
    }
}

/// Seed `collection` from `source_path` if it is empty
pub async fn ensure_seeded(
    store: &dyn DocumentStore,
    collection: &str,
    source_path: impl Into<PathBuf>,
) -> SeedOutcome {
    Seeder::new(collection, source_path).ensure_seeded(store).await
}
