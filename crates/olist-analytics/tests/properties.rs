//! Filter and aggregate properties over generated order sets.

use chrono::{Duration, NaiveDate};
use olist_analytics::aggregate::{
    average_review_score, by_category, by_month, order_count, top_n_statuses, total_revenue,
};
use olist_analytics::filter::apply;
use olist_analytics::{AggFn, FilterSpec};
use olist_model::{CategoryColumn, Dataset, OrderRecord, ValueColumn, View};
use olist_test_utils::{date, dataset, order};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

const STATUSES: &[&str] = &["delivered", "shipped", "canceled", "invoiced", "not_defined"];
const PAYMENTS: &[&str] = &["credit_card", "boleto", "voucher", "debit_card"];

fn base_day() -> NaiveDate {
    date("2022-01-01")
}

fn arb_order() -> impl Strategy<Value = OrderRecord> {
    (
        0_u32..40,
        0_i64..90,
        0_u32..24,
        0..STATUSES.len(),
        0..PAYMENTS.len(),
        0_u32..100_000,
        proptest::option::of(1_u8..=5),
    )
        .prop_map(|(id, day, hour, status, payment, cents, review)| {
            let purchased = base_day() + Duration::days(day);
            let ts = format!("{purchased} {hour:02}:00:00");
            order(
                &format!("o-{id}"),
                &ts,
                STATUSES[status],
                PAYMENTS[payment],
                f64::from(cents) / 100.0,
                review.map(f64::from),
            )
        })
}

fn arb_dataset() -> impl Strategy<Value = Arc<Dataset>> {
    proptest::collection::vec(arb_order(), 0..60).prop_map(dataset)
}

fn pick<'a>(values: &[&'a str], mask: &[bool]) -> Vec<&'a str> {
    values
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(v, _)| *v)
        .collect()
}

/// An outer filter and one nested inside it
fn arb_nested_specs() -> impl Strategy<Value = (FilterSpec, FilterSpec)> {
    (
        0_i64..90,
        0_i64..90,
        0_i64..90,
        0_i64..90,
        proptest::collection::vec(any::<bool>(), STATUSES.len()),
        proptest::collection::vec(any::<bool>(), STATUSES.len()),
        proptest::collection::vec(any::<bool>(), PAYMENTS.len()),
        proptest::collection::vec(any::<bool>(), PAYMENTS.len()),
    )
        .prop_map(|(a, b, c, d, outer_s, inner_s, outer_p, inner_p)| {
            let (lo, hi) = (a.min(b), a.max(b));
            let inner_lo = lo + c % (hi - lo + 1);
            let inner_hi = inner_lo + d % (hi - inner_lo + 1);

            let outer = FilterSpec::new(base_day() + Duration::days(lo), base_day() + Duration::days(hi))
                .with_statuses(pick(STATUSES, &outer_s))
                .with_payment_types(pick(PAYMENTS, &outer_p));

            let inner_statuses: Vec<bool> = outer_s.iter().zip(&inner_s).map(|(o, i)| *o && *i).collect();
            let inner_payments: Vec<bool> = outer_p.iter().zip(&inner_p).map(|(o, i)| *o && *i).collect();
            let inner = FilterSpec::new(
                base_day() + Duration::days(inner_lo),
                base_day() + Duration::days(inner_hi),
            )
            .with_statuses(pick(STATUSES, &inner_statuses))
            .with_payment_types(pick(PAYMENTS, &inner_payments));

            (inner, outer)
        })
}

fn assert_empty_contract(view: &View) {
    assert!(view.is_empty());
    assert_eq!(total_revenue(view), 0.0);
    assert_eq!(order_count(view), 0);
    assert_eq!(average_review_score(view), None);
    assert!(by_month(view, ValueColumn::PaymentValueTotal, AggFn::Sum).is_empty());
    assert!(by_category(view, CategoryColumn::PaymentTypes, ValueColumn::PaymentValueTotal).is_empty());
    assert!(top_n_statuses(view, 5).is_empty());
}

proptest! {
    #[test]
    fn prop_filter_is_monotonic(data in arb_dataset(), (inner, outer) in arb_nested_specs()) {
        prop_assert!(inner.is_subset_of(&outer));
        let narrow = apply(&data, &inner);
        let wide = apply(&data, &outer);
        prop_assert!(narrow.len() <= wide.len());

        let wide_rows: Vec<usize> = wide.rows().map(|r| r.index()).collect();
        prop_assert!(narrow.rows().all(|r| wide_rows.contains(&r.index())));
    }

    #[test]
    fn prop_category_sums_match_revenue(data in arb_dataset()) {
        let view = View::full(Arc::clone(&data));
        for column in [CategoryColumn::PaymentTypes, CategoryColumn::OrderStatus] {
            let rows = by_category(&view, column, ValueColumn::PaymentValueTotal);
            let grouped: f64 = rows.iter().map(|r| r.sum_value).sum();
            prop_assert!((grouped - total_revenue(&view)).abs() < 1e-6);
            prop_assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), view.len());
            prop_assert!(rows.windows(2).all(|w| w[0].sum_value >= w[1].sum_value));
        }
    }

    #[test]
    fn prop_month_sums_match_revenue(data in arb_dataset()) {
        let view = View::full(Arc::clone(&data));
        let months = by_month(&view, ValueColumn::PaymentValueTotal, AggFn::Sum);
        let total: f64 = months.iter().filter_map(|m| m.value).sum();
        prop_assert!((total - total_revenue(&view)).abs() < 1e-6);
        prop_assert!(months.windows(2).all(|w| w[0].month < w[1].month));
    }

    #[test]
    fn prop_top_statuses_are_descending(data in arb_dataset(), n in 0_usize..8) {
        let view = View::full(Arc::clone(&data));
        let rows = top_n_statuses(&view, n);
        prop_assert!(rows.len() <= n);
        prop_assert!(rows.windows(2).all(|w| w[0].count >= w[1].count));
    }
}

#[test]
fn month_buckets_are_ordered_regardless_of_input_order() {
    let data = dataset(vec![
        order("c", "2022-03-02 10:00:00", "delivered", "boleto", 3.0, None),
        order("a", "2022-01-15 10:00:00", "delivered", "boleto", 1.0, None),
        order("b", "2022-02-28 23:59:59", "delivered", "boleto", 2.0, None),
        order("d", "2022-01-01 00:00:00", "delivered", "boleto", 4.0, None),
    ]);
    let months: Vec<String> = by_month(&View::full(data), ValueColumn::PaymentValueTotal, AggFn::Sum)
        .into_iter()
        .map(|m| m.month)
        .collect();
    assert_eq!(months, vec!["2022-01", "2022-02", "2022-03"]);
}

#[test]
fn range_excluding_every_row_yields_empty_contract() {
    let data = olist_test_utils::sample_dataset();
    let spec = FilterSpec::full_domain(&data)
        .unwrap()
        .with_date_range(date("2023-01-01"), date("2023-12-31"));
    let view = apply(&data, &spec);
    assert_empty_contract(&view);
}

#[test]
fn empty_dataset_yields_empty_contract() {
    assert_empty_contract(&View::full(Arc::new(Dataset::empty())));
}
