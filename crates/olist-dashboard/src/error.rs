//! Error types for the dashboard pipeline

use olist_analytics::AnalyticsError;
use olist_store::StoreError;

/// Errors that stop the dashboard from producing a view
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Store could not be opened or did not answer in time
    #[error("cannot reach the order store: {0}")]
    Connection(#[from] StoreError),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Dataset could not be loaded
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl DashboardError {
    /// Check if the pipeline must halt instead of rendering
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Config(_) => true,
            Self::Analytics(e) => e.is_connection(),
        }
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures_are_fatal() {
        let err: DashboardError = StoreError::connection("memory://", 5000, "refused").into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("refused"));

        let err: DashboardError = AnalyticsError::from(StoreError::Read("cursor closed".into())).into();
        assert!(!err.is_fatal());
    }
}
