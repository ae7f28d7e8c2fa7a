//! Error types for store access and seeding
//!
//! Provides error handling for:
//! - Store connectivity (fatal to the pipeline)
//! - Store reads and writes
//! - Seed file ingestion (non-fatal; callers degrade to a warning)

use std::path::PathBuf;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store not reachable within the server-selection timeout
    #[error("store unreachable at {uri} within {timeout_ms}ms: {reason}")]
    Connection {
        uri: String,
        timeout_ms: u64,
        reason: String,
    },

    /// Write rejected (malformed or duplicate records)
    #[error("write rejected: {0}")]
    Write(String),

    /// Read failed after a connection was established
    #[error("read failed: {0}")]
    Read(String),

    /// No backend for the connection string scheme
    #[error("unsupported store scheme: '{0}'")]
    UnsupportedScheme(String),
}

impl StoreError {
    /// Create connection error
    pub fn connection(uri: impl Into<String>, timeout_ms: u64, reason: impl Into<String>) -> Self {
        Self::Connection {
            uri: uri.into(),
            timeout_ms,
            reason: reason.into(),
        }
    }

    /// Check if error means the store is unreachable
    #[inline]
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::UnsupportedScheme(_))
    }
}

/// Errors during the initial load of the seed file
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Seed file absent
    #[error("seed file not found at {}", .0.display())]
    FileMissing(PathBuf),

    /// IO error during file read
    #[error("io error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimited text could not be parsed
    #[error("malformed seed file at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// Header lacks a required column
    #[error("seed file is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// Emptiness check against the store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Batch insert failed
    #[error("seed write failed: {0}")]
    Write(#[source] StoreError),
}

impl SeedError {
    /// Create IO error for path, mapping not-found to [`SeedError::FileMissing`]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileMissing(path)
        } else {
            Self::Read { path, source }
        }
    }
}

impl From<csv::Error> for SeedError {
    fn from(e: csv::Error) -> Self {
        Self::Parse {
            line: e.position().map_or(0, csv::Position::line),
            reason: e.to_string(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
