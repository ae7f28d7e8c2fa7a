//! Olist Order Model
//!
//! Typed order records and the in-memory tabular form they are analysed in.
//!
//! # Core Concepts
//!
//! - [`Record`]: Loosely typed document as exchanged with the store
//! - [`FieldValue`]: A single cell of a [`Record`]
//! - [`OrderRecord`]: A normalized, fully typed purchase order
//! - [`Dataset`]: Columnar table of orders, immutable once built
//! - [`View`]: Read-only row selection over a shared [`Dataset`]
//!
//! # Example
//!
//! ```rust,ignore
//! use olist_model::{Dataset, Record, View};
//!
//! let (dataset, rejected) = Dataset::from_records(&records);
//! let view = View::full(Arc::new(dataset));
//! println!("{} orders, {} rejected", view.len(), rejected.len());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod dataset;
mod error;
mod order;
mod timestamp;
mod value;
mod view;

pub use dataset::{CategoryColumn, Dataset, FilterOptions, OrderRow, ValueColumn};
pub use error::{ModelError, ModelResult};
pub use order::{fields, OrderRecord, NOT_DEFINED};
pub use timestamp::{end_of_day, month_label, parse_timestamp};
pub use value::{FieldValue, Record};
pub use view::View;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
