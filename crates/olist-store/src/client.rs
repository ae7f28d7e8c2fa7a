//! Store client contract
//!
//! The backing document store is reached through [`DocumentStore`]. One handle
//! is created at startup by [`connect`] and shared as a [`SharedStore`]; every
//! component receives it explicitly instead of reaching for a global.

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;
use async_trait::async_trait;
use olist_model::Record;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Minimal read/write contract of the backing document store
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Connection string with credentials removed, for diagnostics
    fn display_uri(&self) -> String;

    /// Round-trip to the server; fails with `StoreError::Connection`
    async fn ping(&self) -> StoreResult<()>;

    /// Number of documents in a collection (0 if it does not exist)
    async fn count(&self, collection: &str) -> StoreResult<u64>;

    /// Append documents in one batch, returning how many were written
    async fn insert_many(&self, collection: &str, records: Vec<Record>) -> StoreResult<usize>;

    /// All documents of a collection, without the listed fields
    async fn find_all(&self, collection: &str, exclude_fields: &[&str]) -> StoreResult<Vec<Record>>;
}

/// Process-wide store handle
pub type SharedStore = Arc<dyn DocumentStore>;

/// Connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Connection string; the scheme selects the backend
    pub uri: String,
    /// Logical database name
    pub database: String,
    /// Server-selection timeout, unless the URI sets its own
    pub timeout: Duration,
}

/// Connection-string option overriding [`ConnectOptions::timeout`]
pub const URI_TIMEOUT_OPTION: &str = "serverSelectionTimeoutMS";

impl ConnectOptions {
    /// Create options with the default 5 second timeout
    #[must_use]
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// With server-selection timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout in force: `serverSelectionTimeoutMS` from the URI, else `timeout`
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        uri_timeout(&self.uri).unwrap_or(self.timeout)
    }
}

/// `serverSelectionTimeoutMS` carried in a connection string, if any
///
/// Option names are matched case-insensitively; an unparseable value is ignored.
#[must_use]
pub fn uri_timeout(uri: &str) -> Option<Duration> {
    let (_, query) = uri.split_once('?')?;
    query
        .split(['&', ';'])
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case(URI_TIMEOUT_OPTION))
        .and_then(|(_, value)| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Open the store named by `options.uri` and verify it answers in time.
///
/// `memory://` opens an empty in-process store; `mongodb://` and
/// `mongodb+srv://` require the `mongo` feature. Client construction
/// (including SRV resolution) and the ping share one
/// [`ConnectOptions::effective_timeout`] budget.
///
/// # Errors
/// - `StoreError::UnsupportedScheme` if no backend handles the scheme
/// - `StoreError::Connection` if the store does not answer within the timeout
pub async fn connect(options: &ConnectOptions) -> StoreResult<SharedStore> {
    let scheme = options.uri.split("://").next().unwrap_or_default();
    let timeout = options.effective_timeout();
    tracing::info!(
        uri = %redact_uri(&options.uri),
        scheme,
        ?timeout,
        "connecting to store"
    );

    let store: SharedStore = match scheme {
        "memory" => Arc::new(MemoryStore::new()),
        #[cfg(feature = "mongo")]
        "mongodb" | "mongodb+srv" => {
            let mongo = within(
                &options.uri,
                timeout,
                crate::mongo::MongoStore::connect(&options.uri, &options.database, timeout),
            )
            .await?;
            Arc::new(mongo)
        }
        other => return Err(StoreError::UnsupportedScheme(other.to_string())),
    };

    check_connection(store.as_ref(), timeout).await?;
    Ok(store)
}

/// Run a connection step, turning an elapsed `timeout` into `StoreError::Connection`
#[cfg_attr(not(feature = "mongo"), allow(dead_code))]
async fn within<T>(
    uri: &str,
    timeout: Duration,
    step: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    match tokio::time::timeout(timeout, step).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::connection(
            redact_uri(uri),
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "connection setup timed out",
        )),
    }
}

/// Ping the store, failing fast once `timeout` elapses
///
/// # Errors
/// `StoreError::Connection` on ping failure or timeout
pub async fn check_connection(store: &dyn DocumentStore, timeout: Duration) -> StoreResult<()> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    match tokio::time::timeout(timeout, store.ping()).await {
        Ok(Ok(())) => {
            tracing::debug!(uri = %store.display_uri(), "store answered ping");
            Ok(())
        }
        Ok(Err(StoreError::Connection { uri, reason, .. })) => {
            Err(StoreError::connection(uri, timeout_ms, reason))
        }
        Ok(Err(other)) => Err(StoreError::connection(
            store.display_uri(),
            timeout_ms,
            other.to_string(),
        )),
        Err(_) => Err(StoreError::connection(
            store.display_uri(),
            timeout_ms,
            "server selection timed out",
        )),
    }
}

/// Strip the `user:password@` part of a connection string
#[must_use]
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => uri.to_string(),
    }
}
