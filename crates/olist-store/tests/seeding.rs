//! Seeding behaviour against the in-memory store.
//!
//! Seeding runs on every startup, so it must be idempotent, must never raise,
//! and must leave the store untouched whenever it cannot complete.

use async_trait::async_trait;
use olist_model::{fields, FieldValue, Record, NOT_DEFINED};
use olist_store::{
    ensure_seeded, DocumentStore, MemoryStore, SeedError, SeedOutcome, Seeder, StoreError,
    StoreResult,
};
use olist_test_utils::temp_seed_file;

const ROWS: &[&str] = &[
    "a,2018-01-01 10:00:00,delivered,credit_card,100.0,5",
    "b,2018-01-02 11:00:00,delivered,boleto,50.0,4",
];

#[tokio::test]
async fn seeding_twice_does_not_duplicate() {
    let (_dir, path) = temp_seed_file(ROWS);
    let store = MemoryStore::new();
    let seeder = Seeder::new("orders", &path);

    let first = seeder.ensure_seeded(&store).await;
    assert!(matches!(first, SeedOutcome::Seeded { inserted: 2, rejected: 0 }));
    assert_eq!(store.count("orders").await.unwrap(), 2);

    let second = seeder.ensure_seeded(&store).await;
    assert!(matches!(second, SeedOutcome::AlreadyPopulated { count: 2 }));
    assert_eq!(store.count("orders").await.unwrap(), 2);
}

#[tokio::test]
async fn missing_payment_type_is_stored_as_not_defined() {
    let (_dir, path) = temp_seed_file(&[
        "a,2018-01-01 10:00:00,delivered,credit_card,100.0,5",
        "b,2018-01-02 11:00:00,delivered,,50.0,4",
    ]);
    let store = MemoryStore::new();

    let (ok, _) = ensure_seeded(&store, "orders", &path).await.into_pair();
    assert!(ok);

    let stored = store.find_all("orders", &[fields::STORE_ID]).await.unwrap();
    let b = stored
        .iter()
        .find(|r| r.get(fields::ORDER_ID) == Some(&FieldValue::from("b")))
        .unwrap();
    assert_eq!(b.get(fields::PAYMENT_TYPES), Some(&FieldValue::from(NOT_DEFINED)));
    assert!(matches!(
        b.get(fields::ORDER_PURCHASE_TIMESTAMP),
        Some(FieldValue::Timestamp(_))
    ));
}

#[tokio::test]
async fn missing_seed_file_is_non_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    let outcome = ensure_seeded(&store, "orders", dir.path().join("absent.csv")).await;
    assert!(!outcome.is_success());
    assert!(matches!(outcome, SeedOutcome::Failed(SeedError::FileMissing(_))));
    assert!(outcome.message().contains("absent.csv"));
    assert_eq!(store.count("orders").await.unwrap(), 0);
}

#[tokio::test]
async fn stale_contents_are_not_refreshed() {
    let (_dir, path) = temp_seed_file(ROWS);
    let store = MemoryStore::new();
    store
        .insert_many("orders", vec![Record::new().with(fields::ORDER_ID, "old")])
        .await
        .unwrap();

    let outcome = ensure_seeded(&store, "orders", &path).await;
    assert!(matches!(outcome, SeedOutcome::AlreadyPopulated { count: 1 }));
    assert_eq!(store.count("orders").await.unwrap(), 1);
}

#[derive(Debug, Default)]
struct RejectingStore;

#[async_trait]
impl DocumentStore for RejectingStore {
    fn display_uri(&self) -> String {
        "rejecting://".into()
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn count(&self, _collection: &str) -> StoreResult<u64> {
        Ok(0)
    }

    async fn insert_many(&self, _collection: &str, _records: Vec<Record>) -> StoreResult<usize> {
        Err(StoreError::Write("document failed validation".into()))
    }

    async fn find_all(&self, _collection: &str, _exclude: &[&str]) -> StoreResult<Vec<Record>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn write_failure_is_folded_into_outcome() {
    let (_dir, path) = temp_seed_file(ROWS);

    let outcome = ensure_seeded(&RejectingStore, "orders", &path).await;
    assert!(matches!(outcome, SeedOutcome::Failed(SeedError::Write(_))));
    assert!(outcome.message().contains("document failed validation"));
}

#[tokio::test]
async fn unreachable_store_is_reported_not_raised() {
    let (_dir, path) = temp_seed_file(ROWS);
    let store = MemoryStore::unavailable();

    let outcome = ensure_seeded(&store, "orders", &path).await;
    assert!(matches!(outcome, SeedOutcome::Failed(SeedError::Store(_))));
}
