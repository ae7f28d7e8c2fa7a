//! Error types for the analytics pipeline

use olist_store::StoreError;

/// Errors while materializing the dataset
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Store read failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AnalyticsError {
    /// Check if the store was unreachable
    #[inline]
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Store(e) => e.is_connection(),
        }
    }
}

/// Result type alias for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connection_failures() {
        let err: AnalyticsError = StoreError::connection("memory://", 0, "down").into();
        assert!(err.is_connection());
        let err: AnalyticsError = StoreError::Read("cursor".into()).into();
        assert!(!err.is_connection());
    }
}
