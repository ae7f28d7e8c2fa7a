//! Text formatting for terminal output

use crate::render::{DashboardView, RenderOutcome};
use olist_model::FilterOptions;
use std::fmt::Write as _;

/// Brazilian real amount, e.g. `R$ 1,234.56`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ -".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Integer with `,` thousands separators
#[must_use]
pub fn format_count(n: usize) -> String {
    group_thousands(u64::try_from(n).unwrap_or(u64::MAX))
}

/// Score with two decimals, or `n/a` when missing
#[must_use]
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}"))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Selectable filter values as text
#[must_use]
pub fn options_text(options: &FilterOptions) -> String {
    let mut out = String::new();
    let range = match (options.min_date, options.max_date) {
        (Some(min), Some(max)) => format!("{min} .. {max}"),
        _ => "n/a".to_string(),
    };
    let _ = writeln!(out, "Purchase dates:  {range}");
    let _ = writeln!(out, "Order statuses:  {}", options.statuses.join(", "));
    let _ = writeln!(out, "Payment types:   {}", options.payment_types.join(", "));
    out
}

/// Full dashboard summary as text
#[must_use]
pub fn summary_text(outcome: &RenderOutcome) -> String {
    match outcome {
        RenderOutcome::EmptyDataset => {
            "No orders available. Check the store contents and the seed file.\n".to_string()
        }
        RenderOutcome::NoMatches { kpis, .. } => {
            let mut out = String::from("No orders match the selected filters.\n\n");
            let _ = writeln!(out, "Orders:            {}", format_count(kpis.order_count));
            let _ = writeln!(out, "Total revenue:     {}", format_brl(kpis.total_revenue));
            let _ = writeln!(out, "Avg review score:  {}", format_score(kpis.average_review_score));
            out
        }
        RenderOutcome::Ready(view) => view_text(view),
    }
}

fn view_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let k = &view.kpis;
    let _ = writeln!(out, "Filter:            {} .. {}", view.filter.start, view.filter.end);
    let _ = writeln!(out, "Orders:            {}", format_count(k.order_count));
    let _ = writeln!(out, "Total revenue:     {}", format_brl(k.total_revenue));
    let _ = writeln!(out, "Avg review score:  {}", format_score(k.average_review_score));

    out.push_str("\nRevenue by payment type\n");
    for row in &view.payment_breakdown {
        let _ = writeln!(
            out,
            "  {:<14} {:>8} orders  {:>16}",
            row.category,
            format_count(row.count),
            format_brl(row.sum_value)
        );
    }

    out.push_str("\nMonthly revenue / review score\n");
    for (revenue, review) in view.monthly_revenue.iter().zip(&view.monthly_review_score) {
        let _ = writeln!(
            out,
            "  {}  {:>16}  {:>5}",
            revenue.month,
            format_brl(revenue.value.unwrap_or(0.0)),
            format_score(review.value)
        );
    }

    out.push_str("\nTop order statuses\n");
    for row in &view.top_statuses {
        let _ = writeln!(out, "  {:<14} {:>8}", row.status, format_count(row.count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brl_groups_and_rounds() {
        assert_eq!(format_brl(0.0), "R$ 0.00");
        assert_eq!(format_brl(150.0), "R$ 150.00");
        assert_eq!(format_brl(1234.567), "R$ 1,234.57");
        assert_eq!(format_brl(13_591_643.7), "R$ 13,591,643.70");
        assert_eq!(format_brl(-5.5), "-R$ 5.50");
    }

    #[test]
    fn counts_and_scores() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(99_441), "99,441");
        assert_eq!(format_score(Some(4.0866)), "4.09");
        assert_eq!(format_score(None), "n/a");
    }

    #[test]
    fn empty_dataset_message() {
        assert!(summary_text(&RenderOutcome::EmptyDataset).contains("No orders available"));
    }
}
