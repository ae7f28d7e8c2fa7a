//! MongoDB-backed store

use crate::client::{redact_uri, DocumentStore};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use olist_model::{FieldValue, Record};
use std::time::Duration;

/// Store client over a MongoDB deployment
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
    uri: String,
    timeout: Duration,
}

impl MongoStore {
    /// Build a client; no round-trip happens until the first operation
    ///
    /// Timeouts set in the connection string are kept; `timeout` fills the
    /// ones it leaves unset.
    ///
    /// # Errors
    /// `StoreError::Connection` if the connection string is invalid
    pub async fn connect(uri: &str, database: &str, timeout: Duration) -> StoreResult<Self> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::connection(redact_uri(uri), timeout_ms, e.to_string()))?;
        let timeout = *options.server_selection_timeout.get_or_insert(timeout);
        options.connect_timeout.get_or_insert(timeout);

        let client = Client::with_options(options)
            .map_err(|e| StoreError::connection(redact_uri(uri), timeout_ms, e.to_string()))?;

        Ok(Self {
            client,
            database: database.to_string(),
            uri: uri.to_string(),
            timeout,
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.client.database(&self.database).collection(name)
    }

    fn connection_error(&self, e: &mongodb::error::Error) -> StoreError {
        StoreError::connection(
            self.display_uri(),
            u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            e.to_string(),
        )
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn display_uri(&self) -> String {
        redact_uri(&self.uri)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| self.connection_error(&e))
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        self.collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    async fn insert_many(&self, collection: &str, records: Vec<Record>) -> StoreResult<usize> {
        if records.is_empty() {
            return Err(StoreError::Write("empty batch".to_string()));
        }
        let documents: Vec<Document> = records.into_iter().map(to_document).collect();
        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(result.inserted_ids.len())
    }

    async fn find_all(&self, collection: &str, exclude_fields: &[&str]) -> StoreResult<Vec<Record>> {
        let projection: Document = exclude_fields
            .iter()
            .map(|field| ((*field).to_string(), Bson::Int32(0)))
            .collect();

        let cursor = self
            .collection(collection)
            .find(doc! {})
            .projection(projection)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        Ok(documents.into_iter().map(from_document).collect())
    }
}

fn to_document(record: Record) -> Document {
    record
        .into_iter()
        .map(|(key, value)| (key, to_bson(value)))
        .collect()
}

fn from_document(document: Document) -> Record {
    document
        .into_iter()
        .map(|(key, value)| (key, from_bson(value)))
        .collect()
}

fn to_bson(value: FieldValue) -> Bson {
    match value {
        FieldValue::Null => Bson::Null,
        FieldValue::Bool(v) => Bson::Boolean(v),
        FieldValue::Int(v) => Bson::Int64(v),
        FieldValue::Float(v) if v.is_nan() => Bson::Null,
        FieldValue::Float(v) => Bson::Double(v),
        FieldValue::Timestamp(ts) => {
            Bson::DateTime(BsonDateTime::from_millis(ts.and_utc().timestamp_millis()))
        }
        FieldValue::Text(v) => Bson::String(v),
    }
}

fn from_bson(value: Bson) -> FieldValue {
    match value {
        Bson::Null | Bson::Undefined => FieldValue::Null,
        Bson::Boolean(v) => FieldValue::Bool(v),
        Bson::Int32(v) => FieldValue::Int(i64::from(v)),
        Bson::Int64(v) => FieldValue::Int(v),
        Bson::Double(v) => FieldValue::Float(v),
        Bson::String(v) => FieldValue::Text(v),
        Bson::DateTime(dt) => chrono::DateTime::from_timestamp_millis(dt.timestamp_millis())
            .map_or(FieldValue::Null, |d| FieldValue::Timestamp(d.naive_utc())),
        Bson::ObjectId(oid) => FieldValue::Text(oid.to_hex()),
        other => FieldValue::Text(other.to_string()),
    }
}
