//! Store to dataset materialization

use crate::error::AnalyticsResult;
use olist_model::{fields, Dataset};
use olist_store::DocumentStore;
use std::time::Instant;

/// Rejected documents logged individually before summarizing
const MAX_LOGGED_REJECTS: usize = 10;

/// Read every document of `collection` and normalize it into a [`Dataset`].
///
/// Documents that fail coercion are dropped and logged. An empty collection
/// yields a valid empty dataset.
///
/// # Errors
/// `AnalyticsError::Store` if the read fails
pub async fn load_dataset(store: &dyn DocumentStore, collection: &str) -> AnalyticsResult<Dataset> {
    let started = Instant::now();
    let records = store.find_all(collection, &[fields::STORE_ID]).await?;
    let (dataset, rejected) = Dataset::from_records(&records);

    for e in rejected.iter().take(MAX_LOGGED_REJECTS) {
        tracing::warn!(collection, error = %e, "dropping malformed document");
    }
    if rejected.len() > MAX_LOGGED_REJECTS {
        tracing::warn!(
            collection,
            more = rejected.len() - MAX_LOGGED_REJECTS,
            "further malformed documents dropped"
        );
    }
    if dataset.is_empty() {
        tracing::warn!(collection, "collection returned no usable rows");
    }

    tracing::info!(
        collection,
        rows = dataset.len(),
        rejected = rejected.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "dataset loaded from store"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use olist_model::{FieldValue, Record, NOT_DEFINED};
    use olist_store::MemoryStore;

    #[tokio::test]
    async fn loads_and_normalizes() {
        let store = MemoryStore::new();
        store
            .insert_many(
                "orders",
                vec![
                    Record::new()
                        .with(fields::ORDER_ID, "a")
                        .with(fields::ORDER_PURCHASE_TIMESTAMP, "2018-01-01 10:00:00")
                        .with(fields::ORDER_STATUS, 7_i64)
                        .with(fields::PAYMENT_VALUE_TOTAL, 10.0),
                    Record::new()
                        .with(fields::ORDER_ID, "b")
                        .with(fields::PAYMENT_VALUE_TOTAL, FieldValue::Null),
                ],
            )
            .await
            .unwrap();

        let dataset = load_dataset(&store, "orders").await.unwrap();
        assert_eq!(dataset.len(), 1);
        let row = dataset.row(0).unwrap();
        assert_eq!(row.order_status(), "7");
        assert_eq!(row.payment_types(), NOT_DEFINED);
    }

    #[tokio::test]
    async fn empty_collection_is_valid() {
        let store = MemoryStore::new();
        let dataset = load_dataset(&store, "orders").await.unwrap();
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn unreachable_store_errors() {
        let store = MemoryStore::unavailable();
        let err = load_dataset(&store, "orders").await.unwrap_err();
        assert!(err.is_connection());
    }
}
