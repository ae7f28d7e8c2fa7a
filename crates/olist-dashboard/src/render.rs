//! Pure dashboard rendering
//!
//! [`render`] maps a dataset and the user's filter selection to everything
//! the dashboard shows. Nothing here touches the store, so a filter change
//! only re-runs this function over the cached dataset.

use chrono::NaiveDate;
use olist_analytics::aggregate::{self, AggFn, CategoryRow, Kpis, MonthRow, StatusCount};
use olist_analytics::filter::{self, FilterSpec};
use olist_model::{CategoryColumn, Dataset, FilterOptions, ValueColumn, View};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Default length of the top status list
pub const DEFAULT_TOP_STATUSES: usize = 5;

/// User filter selection.
///
/// `None` fields default to the dataset's full domain. An explicitly empty
/// set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub statuses: Option<BTreeSet<String>>,
    pub payment_types: Option<BTreeSet<String>>,
    pub top_statuses: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            statuses: None,
            payment_types: None,
            top_statuses: DEFAULT_TOP_STATUSES,
        }
    }
}

impl FilterState {
    /// With first purchase date
    #[inline]
    #[must_use]
    pub fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    /// With last purchase date
    #[inline]
    #[must_use]
    pub fn with_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// With allowed statuses
    #[must_use]
    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    /// With allowed payment types
    #[must_use]
    pub fn with_payment_types<I, S>(mut self, payment_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_types = Some(payment_types.into_iter().map(Into::into).collect());
        self
    }

    /// With top status list length
    #[inline]
    #[must_use]
    pub fn with_top_statuses(mut self, n: usize) -> Self {
        self.top_statuses = n;
        self
    }

    /// Concrete filter over `dataset`, defaults filled from its domain.
    ///
    /// `None` when the dataset is empty.
    #[must_use]
    pub fn resolve(&self, dataset: &Dataset) -> Option<FilterSpec> {
        let mut spec = FilterSpec::full_domain(dataset)?;
        if let Some(from) = self.from {
            spec.start = from;
        }
        if let Some(to) = self.to {
            spec.end = to;
        }
        if let Some(statuses) = &self.statuses {
            spec.statuses.clone_from(statuses);
        }
        if let Some(payment_types) = &self.payment_types {
            spec.payment_types.clone_from(payment_types);
        }
        Some(spec)
    }
}

/// Everything shown for a non-empty selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Filter actually applied
    pub filter: FilterSpec,
    pub options: FilterOptions,
    pub kpis: Kpis,
    /// Order count and revenue per payment type
    pub payment_breakdown: Vec<CategoryRow>,
    pub monthly_revenue: Vec<MonthRow>,
    pub monthly_review_score: Vec<MonthRow>,
    pub top_statuses: Vec<StatusCount>,
    /// Top statuses plus the remainder
    pub status_share: Vec<StatusCount>,
}

/// Result of rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RenderOutcome {
    /// Store holds no usable orders; nothing to chart
    EmptyDataset,
    /// Filter excluded every order
    NoMatches { options: FilterOptions, kpis: Kpis },
    Ready(DashboardView),
}

impl RenderOutcome {
    /// Charted view, if any
    #[must_use]
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::EmptyDataset | Self::NoMatches { .. } => None,
        }
    }
}

/// Filter `dataset` by `state` and aggregate the result
#[must_use]
pub fn render(dataset: &Arc<Dataset>, state: &FilterState) -> RenderOutcome {
    let Some(spec) = state.resolve(dataset) else {
        return RenderOutcome::EmptyDataset;
    };
    let view = filter::apply(dataset, &spec);
    render_view(spec, &view, state.top_statuses)
}

/// Aggregate an already filtered view
#[must_use]
pub fn render_view(spec: FilterSpec, view: &View, top_statuses: usize) -> RenderOutcome {
    let dataset = view.dataset();
    if dataset.is_empty() {
        return RenderOutcome::EmptyDataset;
    }
    let options = dataset.options();
    let kpis = aggregate::kpis(view);
    if view.is_empty() {
        return RenderOutcome::NoMatches { options, kpis };
    }

    RenderOutcome::Ready(DashboardView {
        filter: spec,
        options,
        kpis,
        payment_breakdown: aggregate::by_category(
            view,
            CategoryColumn::PaymentTypes,
            ValueColumn::PaymentValueTotal,
        ),
        monthly_revenue: aggregate::by_month(view, ValueColumn::PaymentValueTotal, AggFn::Sum),
        monthly_review_score: aggregate::by_month(view, ValueColumn::ReviewScore, AggFn::Mean),
        top_statuses: aggregate::top_n_statuses(view, top_statuses),
        status_share: aggregate::status_share(view, top_statuses),
    })
}
