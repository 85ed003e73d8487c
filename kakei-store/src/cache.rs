//! Keyed cache of read views with explicit invalidation.
//!
//! Single writer per entry, last write wins. Mutations name the stale views
//! and the matching entries are dropped; there is no cross-process coherence.

use std::collections::HashMap;

use chrono::NaiveDate;
use kakei_core::{BudgetGrid, Category, CategorySummary, View};

#[derive(Debug, Default)]
pub struct ViewCache {
    grids: HashMap<i32, BudgetGrid>,
    summaries: HashMap<NaiveDate, Vec<CategorySummary>>,
    categories: Option<Vec<Category>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self, year: i32) -> Option<&BudgetGrid> {
        self.grids.get(&year)
    }

    pub fn put_grid(&mut self, grid: BudgetGrid) {
        self.grids.insert(grid.year, grid);
    }

    pub fn summary(&self, month_key: NaiveDate) -> Option<&[CategorySummary]> {
        self.summaries.get(&month_key).map(|s| s.as_slice())
    }

    pub fn put_summary(&mut self, month_key: NaiveDate, summary: Vec<CategorySummary>) {
        self.summaries.insert(month_key, summary);
    }

    pub fn categories(&self) -> Option<&[Category]> {
        self.categories.as_deref()
    }

    pub fn put_categories(&mut self, categories: Vec<Category>) {
        self.categories = Some(categories);
    }

    /// Drop every entry backing the named views.
    pub fn invalidate(&mut self, views: &[View]) {
        for view in views {
            match view {
                View::Dashboard => self.summaries.clear(),
                View::Budgets => self.grids.clear(),
                View::Categories => self.categories = None,
                // Fixed costs and the calendar are read straight from the
                // store; nothing cached to drop.
                View::FixedCosts | View::Calendar => {}
            }
        }
    }
}
