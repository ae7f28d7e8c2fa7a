//! Olist Analytics
//!
//! Turns the order collection into dashboard figures.
//!
//! # Pipeline
//!
//! ```text
//! DocumentStore ──find_all──> DatasetCache (TTL) ──Arc<Dataset>──┐
//!                                                                │
//!                          FilterSpec ──> filter::apply / ViewCache
//!                                                                │
//!                                                  View ──> aggregate::*
//! ```
//!
//! The dataset is loaded once per TTL window and shared; filters produce
//! views over it and aggregations are pure functions of a view.

#![warn(unreachable_pub)]

pub mod aggregate;
mod cache;
mod error;
pub mod filter;
mod loader;
mod view_cache;

pub use aggregate::{AggFn, CategoryRow, Kpis, MonthRow, StatusCount, OTHER_LABEL};
pub use cache::{CacheStats, Clock, DatasetCache, ManualClock, SystemClock, DEFAULT_TTL};
pub use error::{AnalyticsError, AnalyticsResult};
pub use filter::FilterSpec;
pub use loader::load_dataset;
pub use view_cache::{ViewCache, DEFAULT_VIEW_CAPACITY};
