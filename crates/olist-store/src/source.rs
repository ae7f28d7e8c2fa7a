//! Seed file reader
//!
//! Parses the bundled delimited file into store documents. Column types are
//! inferred per column so each column stays homogeneous; the purchase
//! timestamp column is always coerced to a native timestamp.

use crate::error::SeedError;
use olist_model::{fields, parse_timestamp, FieldValue, OrderRecord, Record, NOT_DEFINED};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Inferred storage type of a seed column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// No non-empty cell
    Empty,
    Int,
    Float,
    Text,
    Timestamp,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = Self::Empty;
        for cell in cells.filter(|c| !c.is_empty()) {
            kind = match kind {
                Self::Empty | Self::Int if cell.parse::<i64>().is_ok() => Self::Int,
                Self::Empty | Self::Int | Self::Float if cell.parse::<f64>().is_ok() => Self::Float,
                _ => return Self::Text,
            };
        }
        kind
    }

    fn convert(self, cell: &str) -> Option<FieldValue> {
        if cell.is_empty() {
            return Some(FieldValue::Null);
        }
        match self {
            Self::Empty => Some(FieldValue::Null),
            Self::Int => cell.parse().ok().map(FieldValue::Int),
            Self::Float => cell.parse().ok().map(FieldValue::Float),
            Self::Text => Some(FieldValue::Text(cell.to_string())),
            Self::Timestamp => parse_timestamp(cell).map(FieldValue::Timestamp),
        }
    }
}

/// Documents read from a seed file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedBatch {
    /// Normalized documents, in file order
    pub records: Vec<Record>,
    /// Rows dropped because a value could not be coerced or the row is not a valid order
    pub rejected: usize,
}

/// The static dataset used to populate an empty store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFile {
    path: PathBuf,
}

impl SeedFile {
    /// Create seed file reference
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and normalize the whole file
    ///
    /// # Errors
    /// - `SeedError::FileMissing` if the file does not exist
    /// - `SeedError::Read` on other IO failures
    /// - `SeedError::Parse` / `SeedError::MissingColumn` on malformed content
    pub async fn read(&self) -> Result<SeedBatch, SeedError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SeedError::io_error(&self.path, e))?;
        parse_seed(bytes.as_slice())
    }
}

/// Parse delimited text with a header row into store documents.
///
/// Missing `order_status` / `payment_types` become `"not_defined"`.
///
/// # Errors
/// - `SeedError::Parse` if a row cannot be read
/// - `SeedError::MissingColumn` if the header lacks the id or timestamp column
pub fn parse_seed<R: Read>(input: R) -> Result<SeedBatch, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    for required in [fields::ORDER_ID, fields::ORDER_PURCHASE_TIMESTAMP] {
        if !headers.iter().any(|h| h == required) {
            return Err(SeedError::MissingColumn(required));
        }
    }

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    let kinds: Vec<ColumnKind> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            if name == fields::ORDER_PURCHASE_TIMESTAMP {
                ColumnKind::Timestamp
            } else {
                ColumnKind::infer(rows.iter().map(|row| row.get(col).unwrap_or_default()))
            }
        })
        .collect();

    let mut batch = SeedBatch::default();
    'rows: for row in &rows {
        let mut record = Record::new();
        for (col, name) in headers.iter().enumerate() {
            let cell = row.get(col).unwrap_or_default();
            let Some(value) = kinds[col].convert(cell) else {
                tracing::warn!(
                    line = row.position().map_or(0, csv::Position::line),
                    column = %name,
                    value = cell,
                    "dropping seed row with unparseable value"
                );
                batch.rejected += 1;
                continue 'rows;
            };
            record.insert(name.as_str(), value);
        }
        record.fill_missing(fields::PAYMENT_TYPES, NOT_DEFINED);
        record.fill_missing(fields::ORDER_STATUS, NOT_DEFINED);
        if let Err(e) = OrderRecord::from_record(&record) {
            tracing::warn!(
                line = row.position().map_or(0, csv::Position::line),
                error = %e,
                "dropping seed row that is not a valid order"
            );
            batch.rejected += 1;
            continue;
        }
        batch.records.push(record);
    }

    tracing::debug!(
        rows = rows.len(),
        accepted = batch.records.len(),
        rejected = batch.rejected,
        "parsed seed file"
    );
    Ok(batch)
}
