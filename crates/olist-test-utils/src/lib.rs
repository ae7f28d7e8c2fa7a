//! Testing utilities for the Olist analytics workspace
//!
//! Shared order fixtures and seed-file helpers.

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveDateTime};
use olist_model::{Dataset, OrderRecord};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SEED_HEADER: &str =
    "order_id,order_purchase_timestamp,order_status,payment_types,payment_value_total,review_score";

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub fn order(
    id: &str,
    purchased_at: &str,
    status: &str,
    payment: &str,
    total: f64,
    review: Option<f64>,
) -> OrderRecord {
    OrderRecord {
        order_id: id.to_string(),
        order_purchase_timestamp: ts(purchased_at),
        order_status: status.to_string(),
        payment_types: payment.to_string(),
        payment_value_total: total,
        review_score: review,
    }
}

pub fn dataset(orders: Vec<OrderRecord>) -> Arc<Dataset> {
    Arc::new(Dataset::from_orders(orders))
}

/// Orders spanning Jan-Mar 2022, deliberately out of chronological order
pub fn sample_orders() -> Vec<OrderRecord> {
    vec![
        order("o-1", "2022-03-05 10:00:00", "delivered", "credit_card", 120.0, Some(5.0)),
        order("o-2", "2022-01-10 09:30:00", "delivered", "boleto", 80.0, Some(4.0)),
        order("o-3", "2022-02-14 18:45:00", "shipped", "credit_card", 45.5, None),
        order("o-4", "2022-01-31 23:59:59", "canceled", "voucher", 15.0, Some(1.0)),
        order("o-5", "2022-02-01 00:00:00", "delivered", "credit_card", 200.0, Some(3.0)),
        order("o-6", "2022-03-31 12:00:00", "invoiced", "debit_card", 60.0, Some(5.0)),
        order("o-7", "2022-02-20 08:00:00", "delivered", "boleto", 30.0, None),
    ]
}

pub fn sample_dataset() -> Arc<Dataset> {
    dataset(sample_orders())
}

/// Render seed rows (already comma-joined, without header) as file contents
pub fn seed_contents(rows: &[&str]) -> String {
    let mut out = String::from(SEED_HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(out, "{row}");
    }
    out
}

/// Write a seed file into `dir` and return its path
pub fn write_seed_file(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("dataset_final_simple.csv");
    std::fs::write(&path, seed_contents(rows)).unwrap();
    path
}

/// Temporary directory holding a seed file
pub fn temp_seed_file(rows: &[&str]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_seed_file(dir.path(), rows);
    (dir, path)
}
