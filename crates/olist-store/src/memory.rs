//! In-process document store
//!
//! Backs `memory://` connection strings (demo mode) and stands in for the
//! real store in tests.

use crate::client::DocumentStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use olist_model::{fields, FieldValue, Record};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use ulid::Ulid;

/// Document store held in memory
///
/// Collections are created on first insert. Every stored document gets a
/// `_id` field (a ULID string) unless it already carries one.
#[derive(Debug)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Record>>,
    available: AtomicBool,
    find_calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create empty, reachable store
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            available: AtomicBool::new(true),
            find_calls: AtomicUsize::new(0),
        }
    }

    /// Create store that refuses every operation as unreachable
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    /// Simulate the server going away or coming back
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `find_all` calls served so far
    #[must_use]
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::connection(
                self.display_uri(),
                0,
                "in-memory store marked unavailable",
            ))
        }
    }

    fn append(&self, collection: &str, records: Vec<Record>) -> StoreResult<usize> {
        let mut stored = self.collections.entry(collection.to_string()).or_default();

        let mut seen: HashSet<String> = stored
            .iter()
            .filter_map(|r| r.get(fields::STORE_ID).and_then(FieldValue::as_category))
            .collect();

        let mut batch = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            if record.is_empty() {
                return Err(StoreError::Write(format!(
                    "document {position} of batch has no fields"
                )));
            }
            let id = match record.get(fields::STORE_ID).and_then(FieldValue::as_category) {
                Some(id) => id,
                None => Ulid::new().to_string(),
            };
            if !seen.insert(id.clone()) {
                return Err(StoreError::Write(format!(
                    "duplicate key for {}: {id}",
                    fields::STORE_ID
                )));
            }
            let document: Record = std::iter::once((fields::STORE_ID.to_string(), FieldValue::Text(id)))
                .chain(record.into_iter().filter(|(k, _)| k != fields::STORE_ID))
                .collect();
            batch.push(document);
        }

        let written = batch.len();
        stored.extend(batch);
        Ok(written)
    }

    fn snapshot(&self, collection: &str, exclude_fields: &[&str]) -> Vec<Record> {
        self.collections
            .get(collection)
            .map(|stored| {
                stored
                    .iter()
                    .map(|record| {
                        let mut copy = record.clone();
                        for field in exclude_fields {
                            copy.remove(field);
                        }
                        copy
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn display_uri(&self) -> String {
        "memory://".to_string()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_available()
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        self.ensure_available()?;
        let count = self.collections.get(collection).map_or(0, |c| c.len());
        Ok(count as u64)
    }

    async fn insert_many(&self, collection: &str, records: Vec<Record>) -> StoreResult<usize> {
        self.ensure_available()?;
        if records.is_empty() {
            return Err(StoreError::Write("empty batch".to_string()));
        }
        let written = self.append(collection, records)?;
        tracing::debug!(collection, written, "memory store insert");
        Ok(written)
    }

    async fn find_all(&self, collection: &str, exclude_fields: &[&str]) -> StoreResult<Vec<Record>> {
        self.ensure_available()?;
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot(collection, exclude_fields))
    }
}
