//! Normalized purchase order

use crate::error::{ModelError, ModelResult};
use crate::timestamp::parse_timestamp;
use crate::value::{FieldValue, Record};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Field names shared by the seed file, the store and the dataset
pub mod fields {
    pub const ORDER_ID: &str = "order_id";
    pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
    pub const ORDER_STATUS: &str = "order_status";
    pub const PAYMENT_TYPES: &str = "payment_types";
    pub const PAYMENT_VALUE_TOTAL: &str = "payment_value_total";
    pub const REVIEW_SCORE: &str = "review_score";
    /// Identity field assigned by the store
    pub const STORE_ID: &str = "_id";
}

/// Sentinel for a missing categorical value
pub const NOT_DEFINED: &str = "not_defined";

/// A purchase order with every required field populated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_status: String,
    pub payment_types: String,
    pub payment_value_total: f64,
    pub review_score: Option<f64>,
}

impl OrderRecord {
    /// Coerce a store document into a typed order.
    ///
    /// Categorical fields fall back to [`NOT_DEFINED`]; non-string categorical
    /// values are stringified. The identifier, timestamp and a non-negative
    /// total are required.
    ///
    /// # Errors
    /// - `ModelError::MissingField` if a required field is absent or null
    /// - `ModelError::MalformedField` if a field cannot be coerced
    pub fn from_record(record: &Record) -> ModelResult<Self> {
        let order_id = record
            .get_present(fields::ORDER_ID)
            .and_then(FieldValue::as_category)
            .ok_or(ModelError::MissingField(fields::ORDER_ID))?;

        let order_purchase_timestamp = match record.get_present(fields::ORDER_PURCHASE_TIMESTAMP) {
            None => return Err(ModelError::MissingField(fields::ORDER_PURCHASE_TIMESTAMP)),
            Some(FieldValue::Timestamp(ts)) => *ts,
            Some(FieldValue::Text(raw)) => parse_timestamp(raw).ok_or_else(|| {
                ModelError::malformed(
                    &order_id,
                    fields::ORDER_PURCHASE_TIMESTAMP,
                    format!("unrecognized timestamp '{raw}'"),
                )
            })?,
            Some(other) => {
                return Err(ModelError::malformed(
                    &order_id,
                    fields::ORDER_PURCHASE_TIMESTAMP,
                    format!("expected timestamp, got {}", other.type_name()),
                ))
            }
        };

        let payment_value_total = record
            .get_present(fields::PAYMENT_VALUE_TOTAL)
            .ok_or(ModelError::MissingField(fields::PAYMENT_VALUE_TOTAL))?
            .as_f64()
            .ok_or_else(|| {
                ModelError::malformed(&order_id, fields::PAYMENT_VALUE_TOTAL, "not a number")
            })?;
        if !payment_value_total.is_finite() || payment_value_total < 0.0 {
            return Err(ModelError::malformed(
                &order_id,
                fields::PAYMENT_VALUE_TOTAL,
                format!("amount must be finite and non-negative, got {payment_value_total}"),
            ));
        }

        let review_score = match record.get_present(fields::REVIEW_SCORE) {
            None => None,
            Some(value) => Some(value.as_f64().ok_or_else(|| {
                ModelError::malformed(&order_id, fields::REVIEW_SCORE, "not a number")
            })?),
        };

        Ok(Self {
            order_purchase_timestamp,
            order_status: category(record, fields::ORDER_STATUS),
            payment_types: category(record, fields::PAYMENT_TYPES),
            payment_value_total,
            review_score,
            order_id,
        })
    }

    /// Convert back into a store document
    #[must_use]
    pub fn to_record(&self) -> Record {
        Record::new()
            .with(fields::ORDER_ID, self.order_id.as_str())
            .with(fields::ORDER_PURCHASE_TIMESTAMP, self.order_purchase_timestamp)
            .with(fields::ORDER_STATUS, self.order_status.as_str())
            .with(fields::PAYMENT_TYPES, self.payment_types.as_str())
            .with(fields::PAYMENT_VALUE_TOTAL, self.payment_value_total)
            .with(fields::REVIEW_SCORE, self.review_score)
    }
}

fn category(record: &Record, field: &str) -> String {
    record
        .get_present(field)
        .and_then(FieldValue::as_category)
        .unwrap_or_else(|| NOT_DEFINED.to_string())
}
