//! Columnar in-memory order table
//!
//! A [`Dataset`] is built once per load and never mutated afterwards; filtered
//! subsets are expressed as [`View`](crate::View)s over a shared instance.

use crate::error::ModelError;
use crate::order::OrderRecord;
use crate::timestamp::month_key;
use crate::value::Record;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeSet;
use ulid::Ulid;

/// Categorical columns usable as grouping keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryColumn {
    OrderStatus,
    PaymentTypes,
}

impl CategoryColumn {
    /// Column name as stored
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OrderStatus => crate::fields::ORDER_STATUS,
            Self::PaymentTypes => crate::fields::PAYMENT_TYPES,
        }
    }
}

/// Numeric columns usable as aggregation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueColumn {
    PaymentValueTotal,
    ReviewScore,
}

impl ValueColumn {
    /// Column name as stored
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PaymentValueTotal => crate::fields::PAYMENT_VALUE_TOTAL,
            Self::ReviewScore => crate::fields::REVIEW_SCORE,
        }
    }
}

/// Selectable filter domain derived from a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct order statuses, sorted
    pub statuses: Vec<String>,
    /// Distinct payment types, sorted
    pub payment_types: Vec<String>,
    /// Earliest purchase date
    pub min_date: Option<NaiveDate>,
    /// Latest purchase date
    pub max_date: Option<NaiveDate>,
}

/// Columnar table of orders
///
/// Every column has the same length; row `i` of each column belongs to the
/// same order.
#[derive(Debug, Clone)]
pub struct Dataset {
    generation: Ulid,
    order_id: Vec<String>,
    purchased_at: Vec<NaiveDateTime>,
    purchase_date: Vec<NaiveDate>,
    order_status: Vec<String>,
    payment_types: Vec<String>,
    payment_value_total: Vec<f64>,
    review_score: Vec<Option<f64>>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dataset {
    /// Create a valid dataset with no rows
    #[must_use]
    pub fn empty() -> Self {
        Self {
            generation: Ulid::new(),
            order_id: Vec::new(),
            purchased_at: Vec::new(),
            purchase_date: Vec::new(),
            order_status: Vec::new(),
            payment_types: Vec::new(),
            payment_value_total: Vec::new(),
            review_score: Vec::new(),
        }
    }

    /// Build from already normalized orders, preserving their order
    #[must_use]
    pub fn from_orders(orders: impl IntoIterator<Item = OrderRecord>) -> Self {
        let mut dataset = Self::empty();
        for order in orders {
            dataset.push(order);
        }
        dataset
    }

    /// Normalize store documents into a dataset.
    ///
    /// Documents that fail coercion are skipped and returned alongside the
    /// dataset so the caller can report them.
    #[must_use]
    pub fn from_records(records: &[Record]) -> (Self, Vec<ModelError>) {
        let mut dataset = Self::empty();
        let mut rejected = Vec::new();
        for record in records {
            match OrderRecord::from_record(record) {
                Ok(order) => dataset.push(order),
                Err(e) => rejected.push(e),
            }
        }
        (dataset, rejected)
    }

    fn push(&mut self, order: OrderRecord) {
        self.purchase_date.push(order.order_purchase_timestamp.date());
        self.purchased_at.push(order.order_purchase_timestamp);
        self.order_id.push(order.order_id);
        self.order_status.push(order.order_status);
        self.payment_types.push(order.payment_types);
        self.payment_value_total.push(order.payment_value_total);
        self.review_score.push(order.review_score);
    }

    /// Unique id of this materialization
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Ulid {
        self.generation
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order_id.len()
    }

    /// Check if dataset has no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_id.is_empty()
    }

    /// Row accessor
    #[must_use]
    pub fn row(&self, index: usize) -> Option<OrderRow<'_>> {
        (index < self.len()).then_some(OrderRow {
            dataset: self,
            index,
        })
    }

    /// Purchase timestamp column
    #[inline]
    #[must_use]
    pub fn purchased_at(&self) -> &[NaiveDateTime] {
        &self.purchased_at
    }

    /// Derived purchase date column
    #[inline]
    #[must_use]
    pub fn purchase_dates(&self) -> &[NaiveDate] {
        &self.purchase_date
    }

    /// Categorical column
    #[must_use]
    pub fn category_column(&self, column: CategoryColumn) -> &[String] {
        match column {
            CategoryColumn::OrderStatus => &self.order_status,
            CategoryColumn::PaymentTypes => &self.payment_types,
        }
    }

    /// Earliest and latest purchase date
    #[must_use]
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.purchase_date.iter().min()?;
        let max = self.purchase_date.iter().max()?;
        Some((*min, *max))
    }

    /// Sorted distinct values of a categorical column
    #[must_use]
    pub fn distinct(&self, column: CategoryColumn) -> Vec<String> {
        self.category_column(column)
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Full selectable domain for filters
    #[must_use]
    pub fn options(&self) -> FilterOptions {
        let bounds = self.date_bounds();
        FilterOptions {
            statuses: self.distinct(CategoryColumn::OrderStatus),
            payment_types: self.distinct(CategoryColumn::PaymentTypes),
            min_date: bounds.map(|(min, _)| min),
            max_date: bounds.map(|(_, max)| max),
        }
    }
}

/// Borrowed row of a [`Dataset`]
#[derive(Debug, Clone, Copy)]
pub struct OrderRow<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> OrderRow<'a> {
    /// Row position within the dataset
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn order_id(&self) -> &'a str {
        &self.dataset.order_id[self.index]
    }

    #[inline]
    #[must_use]
    pub fn purchased_at(&self) -> NaiveDateTime {
        self.dataset.purchased_at[self.index]
    }

    #[inline]
    #[must_use]
    pub fn purchase_date(&self) -> NaiveDate {
        self.dataset.purchase_date[self.index]
    }

    /// Calendar month bucket `(year, month)`
    #[inline]
    #[must_use]
    pub fn purchase_month(&self) -> (i32, u32) {
        month_key(&self.dataset.purchased_at[self.index])
    }

    #[inline]
    #[must_use]
    pub fn order_status(&self) -> &'a str {
        &self.dataset.order_status[self.index]
    }

    #[inline]
    #[must_use]
    pub fn payment_types(&self) -> &'a str {
        &self.dataset.payment_types[self.index]
    }

    #[inline]
    #[must_use]
    pub fn payment_value_total(&self) -> f64 {
        self.dataset.payment_value_total[self.index]
    }

    #[inline]
    #[must_use]
    pub fn review_score(&self) -> Option<f64> {
        self.dataset.review_score[self.index]
    }

    /// Value of a categorical column
    #[must_use]
    pub fn category(&self, column: CategoryColumn) -> &'a str {
        &self.dataset.category_column(column)[self.index]
    }

    /// Value of a numeric column; `None` for a missing review score
    #[must_use]
    pub fn value(&self, column: ValueColumn) -> Option<f64> {
        match column {
            ValueColumn::PaymentValueTotal => Some(self.payment_value_total()),
            ValueColumn::ReviewScore => self.review_score(),
        }
    }
}
