//! Error types for record normalization

/// Errors raised while coercing a store document into an [`OrderRecord`](crate::OrderRecord)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A required field is absent or null
    #[error("record is missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but cannot be coerced to its column type
    #[error("malformed field '{field}' in order {order_id}: {reason}")]
    MalformedField {
        order_id: String,
        field: &'static str,
        reason: String,
    },
}

impl ModelError {
    /// Create malformed field error
    pub fn malformed(
        order_id: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            order_id: order_id.into(),
            field,
            reason: reason.into(),
        }
    }

    /// Field that failed coercion
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) | Self::MalformedField { field, .. } => field,
        }
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display() {
        let err = ModelError::MissingField("order_id");
        assert_eq!(err.to_string(), "record is missing required field 'order_id'");
    }

    #[test]
    fn malformed_field_reports_field() {
        let err = ModelError::malformed("o-1", "payment_value_total", "negative amount");
        assert_eq!(err.field(), "payment_value_total");
        assert!(err.to_string().contains("o-1"));
    }
}
