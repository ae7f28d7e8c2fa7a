//! Read-only row selections over a shared dataset

use crate::dataset::{Dataset, OrderRow};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    All,
    /// Ascending row indices
    Rows(Vec<usize>),
}

/// Full dataset or a filtered subset of it.
///
/// A view never copies order data; it shares the dataset and records which
/// rows are visible, so the dataset itself is never mutated by filtering.
#[derive(Debug, Clone)]
pub struct View {
    dataset: Arc<Dataset>,
    selection: Selection,
}

impl View {
    /// View over every row
    #[inline]
    #[must_use]
    pub fn full(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            selection: Selection::All,
        }
    }

    /// View over explicit rows; out-of-range indices are dropped
    #[must_use]
    pub fn from_rows(dataset: Arc<Dataset>, mut rows: Vec<usize>) -> Self {
        rows.retain(|&i| i < dataset.len());
        rows.sort_unstable();
        rows.dedup();
        Self {
            dataset,
            selection: Selection::Rows(rows),
        }
    }

    /// Underlying dataset
    #[inline]
    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Number of visible rows
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.selection {
            Selection::All => self.dataset.len(),
            Selection::Rows(rows) => rows.len(),
        }
    }

    /// Check if no row is visible
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the view spans the whole dataset
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.dataset.len()
    }

    /// Visible rows in dataset order
    pub fn rows(&self) -> impl Iterator<Item = OrderRow<'_>> + '_ {
        let indices: Box<dyn Iterator<Item = usize> + '_> = match &self.selection {
            Selection::All => Box::new(0..self.dataset.len()),
            Selection::Rows(rows) => Box::new(rows.iter().copied()),
        };
        indices.filter_map(move |i| self.dataset.row(i))
    }
}

impl From<Arc<Dataset>> for View {
    fn from(dataset: Arc<Dataset>) -> Self {
        Self::full(dataset)
    }
}
