//! Pure aggregations over a [`View`]
//!
//! Every function accepts an empty view and returns the zero result for it:
//! `0` for sums and counts, `None` for means, empty sequences for groupings.
//! Outputs are plain row structs so callers never see the columnar layout.

use indexmap::IndexMap;
use olist_model::{month_label, CategoryColumn, ValueColumn, View};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Label of the remainder row in [`status_share`]
pub const OTHER_LABEL: &str = "other";

/// Per-bucket reduction for [`by_month`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggFn {
    Sum,
    Mean,
}

/// One group of [`by_category`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    /// Rows in the group
    pub count: usize,
    /// Sum of the value column; missing values contribute nothing
    pub sum_value: f64,
}

/// One bucket of [`by_month`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    /// `YYYY-MM`
    pub month: String,
    /// `None` when a mean has no values to average
    pub value: Option<f64>,
}

/// One row of [`top_n_statuses`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Headline indicators of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub order_count: usize,
    pub average_review_score: Option<f64>,
}

/// Sum of `payment_value_total`; `0.0` for an empty view
#[must_use]
pub fn total_revenue(view: &View) -> f64 {
    if view.is_empty() {
        return 0.0;
    }
    view.rows().map(|row| row.payment_value_total()).sum()
}

/// Number of distinct order ids
#[must_use]
pub fn order_count(view: &View) -> usize {
    if view.is_empty() {
        return 0;
    }
    view.rows().map(|row| row.order_id()).collect::<HashSet<_>>().len()
}

/// Mean review score over rows that have one.
///
/// `None` for an empty view or when no row carries a score.
#[must_use]
pub fn average_review_score(view: &View) -> Option<f64> {
    if view.is_empty() {
        return None;
    }
    mean(view.rows().filter_map(|row| row.review_score()))
}

/// Group by a categorical column, sorted by descending `sum_value`.
///
/// Equal sums keep the order in which their categories first appear.
#[must_use]
pub fn by_category(view: &View, category: CategoryColumn, value: ValueColumn) -> Vec<CategoryRow> {
    if view.is_empty() {
        return Vec::new();
    }

    let mut groups: IndexMap<&str, (usize, f64)> = IndexMap::new();
    for row in view.rows() {
        let entry = groups.entry(row.category(category)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += row.value(value).unwrap_or(0.0);
    }

    let mut rows: Vec<CategoryRow> = groups
        .into_iter()
        .map(|(category, (count, sum_value))| CategoryRow {
            category: category.to_string(),
            count,
            sum_value,
        })
        .collect();
    rows.sort_by(|a, b| b.sum_value.total_cmp(&a.sum_value));
    rows
}

/// Bucket by calendar month of purchase, ascending by month
#[must_use]
pub fn by_month(view: &View, value: ValueColumn, agg: AggFn) -> Vec<MonthRow> {
    if view.is_empty() {
        return Vec::new();
    }

    let mut buckets: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for row in view.rows() {
        let bucket = buckets.entry(row.purchase_month()).or_default();
        if let Some(v) = row.value(value) {
            bucket.push(v);
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), values)| MonthRow {
            month: month_label(year, month),
            value: match agg {
                AggFn::Sum => Some(values.iter().sum()),
                AggFn::Mean => mean(values.into_iter()),
            },
        })
        .collect()
}

/// The `n` most frequent order statuses, by descending count.
///
/// Ties keep first-encountered order.
#[must_use]
pub fn top_n_statuses(view: &View, n: usize) -> Vec<StatusCount> {
    let mut counts = status_counts(view);
    counts.truncate(n);
    counts
}

/// Top `n` statuses plus an [`OTHER_LABEL`] row holding the remaining count.
///
/// The remainder row is omitted when nothing is left over.
#[must_use]
pub fn status_share(view: &View, n: usize) -> Vec<StatusCount> {
    let mut counts = status_counts(view);
    if counts.len() <= n {
        return counts;
    }
    let other: usize = counts.drain(n..).map(|s| s.count).sum();
    counts.push(StatusCount {
        status: OTHER_LABEL.to_string(),
        count: other,
    });
    counts
}

/// Total revenue, distinct order count and average review score
#[must_use]
pub fn kpis(view: &View) -> Kpis {
    Kpis {
        total_revenue: total_revenue(view),
        order_count: order_count(view),
        average_review_score: average_review_score(view),
    }
}

fn status_counts(view: &View) -> Vec<StatusCount> {
    if view.is_empty() {
        return Vec::new();
    }

    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for row in view.rows() {
        *counts.entry(row.order_status()).or_insert(0) += 1;
    }

    let mut rows: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();
    // stable: ties stay in first-encountered order
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use olist_model::Dataset;
    use olist_test_utils::{dataset, order, sample_dataset};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn full(data: &Arc<Dataset>) -> View {
        View::full(Arc::clone(data))
    }

    fn empty() -> View {
        View::full(Arc::new(Dataset::empty()))
    }

    #[test]
    fn kpis_of_sample() {
        let view = full(&sample_dataset());
        let k = kpis(&view);
        assert!((k.total_revenue - 550.5).abs() < 1e-9);
        assert_eq!(k.order_count, 7);
        // (5 + 4 + 1 + 3 + 5) / 5
        assert_eq!(k.average_review_score, Some(3.6));
    }

    #[test]
    fn order_count_is_distinct() {
        let data = dataset(vec![
            order("a", "2022-01-01 10:00:00", "delivered", "boleto", 10.0, None),
            order("a", "2022-01-01 10:00:00", "delivered", "voucher", 5.0, None),
            order("b", "2022-01-02 10:00:00", "delivered", "boleto", 1.0, None),
        ]);
        assert_eq!(order_count(&full(&data)), 2);
    }

    #[test]
    fn average_without_scores_is_missing() {
        let data = dataset(vec![order(
            "a",
            "2022-01-01 10:00:00",
            "delivered",
            "boleto",
            10.0,
            None,
        )]);
        assert_eq!(average_review_score(&full(&data)), None);
    }

    #[test]
    fn by_category_sorted_by_sum() {
        let rows = by_category(
            &full(&sample_dataset()),
            CategoryColumn::PaymentTypes,
            ValueColumn::PaymentValueTotal,
        );
        let summary: Vec<(&str, usize, f64)> = rows
            .iter()
            .map(|r| (r.category.as_str(), r.count, r.sum_value))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("credit_card", 3, 365.5),
                ("boleto", 2, 110.0),
                ("debit_card", 1, 60.0),
                ("voucher", 1, 15.0),
            ]
        );
    }

    #[test]
    fn by_category_ties_keep_first_seen_order() {
        let data = dataset(vec![
            order("a", "2022-01-01 10:00:00", "delivered", "voucher", 10.0, None),
            order("b", "2022-01-01 10:00:00", "delivered", "boleto", 10.0, None),
            order("c", "2022-01-01 10:00:00", "delivered", "credit_card", 10.0, None),
        ]);
        let rows = by_category(&full(&data), CategoryColumn::PaymentTypes, ValueColumn::PaymentValueTotal);
        let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["voucher", "boleto", "credit_card"]);
    }

    #[test]
    fn by_month_is_ascending() {
        let rows = by_month(&full(&sample_dataset()), ValueColumn::PaymentValueTotal, AggFn::Sum);
        assert_eq!(
            rows,
            vec![
                MonthRow { month: "2022-01".into(), value: Some(95.0) },
                MonthRow { month: "2022-02".into(), value: Some(275.5) },
                MonthRow { month: "2022-03".into(), value: Some(180.0) },
            ]
        );
    }

    #[test]
    fn by_month_mean_skips_missing_scores() {
        let data = dataset(vec![
            order("a", "2022-01-01 10:00:00", "delivered", "boleto", 1.0, Some(4.0)),
            order("b", "2022-01-09 10:00:00", "delivered", "boleto", 1.0, None),
            order("c", "2022-02-01 10:00:00", "delivered", "boleto", 1.0, None),
        ]);
        let rows = by_month(&full(&data), ValueColumn::ReviewScore, AggFn::Mean);
        assert_eq!(
            rows,
            vec![
                MonthRow { month: "2022-01".into(), value: Some(4.0) },
                MonthRow { month: "2022-02".into(), value: None },
            ]
        );
    }

    #[test]
    fn top_statuses_with_stable_ties() {
        let rows = top_n_statuses(&full(&sample_dataset()), 3);
        assert_eq!(
            rows,
            vec![
                StatusCount { status: "delivered".into(), count: 4 },
                StatusCount { status: "shipped".into(), count: 1 },
                StatusCount { status: "canceled".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn status_share_adds_other_row() {
        let view = full(&sample_dataset());
        let rows = status_share(&view, 2);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], StatusCount { status: OTHER_LABEL.into(), count: 2 });

        let all = status_share(&view, 10);
        assert!(all.iter().all(|s| s.status != OTHER_LABEL));
        assert_eq!(all.iter().map(|s| s.count).sum::<usize>(), 7);
    }

    #[test]
    fn empty_view_is_zero_result() {
        let view = empty();
        assert_eq!(total_revenue(&view), 0.0);
        assert_eq!(order_count(&view), 0);
        assert_eq!(average_review_score(&view), None);
        assert!(by_category(&view, CategoryColumn::OrderStatus, ValueColumn::PaymentValueTotal).is_empty());
        assert!(by_month(&view, ValueColumn::ReviewScore, AggFn::Mean).is_empty());
        assert!(top_n_statuses(&view, 5).is_empty());
        assert!(status_share(&view, 0).is_empty());
    }
}
