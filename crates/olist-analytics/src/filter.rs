//! Conjunctive order filter
//!
//! Three predicates, all applied on every call:
//! - purchase timestamp within `[start 00:00:00, end 23:59:59]`
//! - `order_status` in the allowed set
//! - `payment_types` in the allowed set
//!
//! An empty set matches nothing. Callers wanting "everything" start from
//! [`FilterSpec::full_domain`].

use chrono::{NaiveDate, NaiveTime};
use olist_model::{end_of_day, Dataset, OrderRow, View};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Filter value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// First included purchase date
    pub start: NaiveDate,
    /// Last included purchase date (whole day)
    pub end: NaiveDate,
    /// Allowed order statuses
    pub statuses: BTreeSet<String>,
    /// Allowed payment types
    pub payment_types: BTreeSet<String>,
}

impl FilterSpec {
    /// Date range with no allowed statuses or payment types
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            statuses: BTreeSet::new(),
            payment_types: BTreeSet::new(),
        }
    }

    /// Everything in `dataset`: full date range and every category value.
    ///
    /// `None` for an empty dataset, which has no date range.
    #[must_use]
    pub fn full_domain(dataset: &Dataset) -> Option<Self> {
        let options = dataset.options();
        Some(Self {
            start: options.min_date?,
            end: options.max_date?,
            statuses: options.statuses.into_iter().collect(),
            payment_types: options.payment_types.into_iter().collect(),
        })
    }

    /// With date range
    #[inline]
    #[must_use]
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// With allowed statuses (replacing the current set)
    #[must_use]
    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    /// With allowed payment types (replacing the current set)
    #[must_use]
    pub fn with_payment_types<I, S>(mut self, payment_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_types = payment_types.into_iter().map(Into::into).collect();
        self
    }

    /// Check if every order admitted by `self` is admitted by `other`
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        let range_inside =
            self.start > self.end || (self.start >= other.start && self.end <= other.end);
        range_inside
            && self.statuses.is_subset(&other.statuses)
            && self.payment_types.is_subset(&other.payment_types)
    }

    /// Check if a row passes all three predicates
    #[must_use]
    pub fn matches(&self, row: &OrderRow<'_>) -> bool {
        let purchased_at = row.purchased_at();
        purchased_at >= self.start.and_time(NaiveTime::MIN)
            && purchased_at <= end_of_day(self.end)
            && self.statuses.contains(row.order_status())
            && self.payment_types.contains(row.payment_types())
    }
}

/// Select the rows of `dataset` matching `spec`.
///
/// The dataset is shared, not copied or modified.
#[must_use]
pub fn apply(dataset: &Arc<Dataset>, spec: &FilterSpec) -> View {
    let full = View::full(Arc::clone(dataset));
    let rows: Vec<usize> = full
        .rows()
        .filter(|row| spec.matches(row))
        .map(|row| row.index())
        .collect();

    tracing::debug!(
        matched = rows.len(),
        total = dataset.len(),
        start = %spec.start,
        end = %spec.end,
        "filter applied"
    );
    View::from_rows(Arc::clone(dataset), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use olist_test_utils::{dataset, date, order, sample_dataset};

    fn ids(view: &View) -> Vec<&str> {
        view.rows().map(|r| r.order_id()).collect()
    }

    #[test]
    fn full_domain_keeps_everything() {
        let data = sample_dataset();
        let spec = FilterSpec::full_domain(&data).unwrap();
        let view = apply(&data, &spec);
        assert_eq!(view.len(), data.len());
        assert_eq!(spec.start, date("2022-01-10"));
        assert_eq!(spec.end, date("2022-03-31"));
    }

    #[test]
    fn full_domain_of_empty_dataset_is_none() {
        assert!(FilterSpec::full_domain(&Dataset::empty()).is_none());
    }

    #[test]
    fn end_day_is_inclusive() {
        let data = dataset(vec![
            order("late", "2022-01-31 23:59:59", "delivered", "boleto", 1.0, None),
            order("next", "2022-02-01 00:00:00", "delivered", "boleto", 1.0, None),
        ]);
        let spec = FilterSpec::full_domain(&data)
            .unwrap()
            .with_date_range(date("2022-01-31"), date("2022-01-31"));
        assert_eq!(ids(&apply(&data, &spec)), vec!["late"]);
    }

    #[test]
    fn empty_sets_exclude_everything() {
        let data = sample_dataset();
        let spec = FilterSpec::new(date("2000-01-01"), date("2100-01-01"));
        assert!(apply(&data, &spec).is_empty());

        let only_status = FilterSpec::full_domain(&data)
            .unwrap()
            .with_payment_types(Vec::<String>::new());
        assert!(apply(&data, &only_status).is_empty());
    }

    #[test]
    fn predicates_are_conjunctive() {
        let data = sample_dataset();
        let spec = FilterSpec::full_domain(&data)
            .unwrap()
            .with_statuses(["delivered"])
            .with_payment_types(["credit_card"])
            .with_date_range(date("2022-02-01"), date("2022-03-31"));
        assert_eq!(ids(&apply(&data, &spec)), vec!["o-1", "o-5"]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let data = sample_dataset();
        let spec = FilterSpec::full_domain(&data)
            .unwrap()
            .with_date_range(date("2022-03-01"), date("2022-02-01"));
        assert!(apply(&data, &spec).is_empty());
    }

    #[test]
    fn dataset_is_not_mutated() {
        let data = sample_dataset();
        let before = data.len();
        let spec = FilterSpec::full_domain(&data).unwrap().with_statuses(["shipped"]);
        let view = apply(&data, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(data.len(), before);
        assert!(Arc::ptr_eq(view.dataset(), &data));
    }

    #[test]
    fn subset_relation() {
        let data = sample_dataset();
        let all = FilterSpec::full_domain(&data).unwrap();
        let narrow = all.clone().with_statuses(["delivered"]);
        assert!(narrow.is_subset_of(&all));
        assert!(!all.is_subset_of(&narrow));
    }
}
