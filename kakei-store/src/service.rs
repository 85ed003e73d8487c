//! Service operations: validation, store calls, and view invalidation.
//!
//! Every entry point is a short-lived request/response cycle. Mutations
//! require an owner, return the set of now-stale views, and never leave a
//! half-written single cell; the two documented multi-row cases (reorder,
//! holiday replacement) are handled per their contracts.

use chrono::NaiveDate;
use futures_util::future::join_all;

use kakei_core::{
    BudgetGrid, Category, CategorySummary, Error, FixedCostDraft, FixedCostTemplate, MonthWindow,
    NewScheduleEntry, NewTransaction, ScheduleEntry, ScheduleKind, Transaction, TransactionDraft,
    View, assign_sort_orders, budget_row, coerce_amount, holiday_dates, materialize, month_end,
    summarize, year_bounds, year_rows,
};

use crate::cache::ViewCache;
use crate::store::{BudgetStore, CategoryStore, FixedCostStore, ScheduleStore, TransactionStore};

/// How many ledger entries the dashboard shows as recent activity.
const RECENT_TRANSACTIONS: usize = 5;

/// Stale logical views reported by a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub stale: Vec<View>,
}

/// Everything the dashboard renders for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub year: i32,
    pub month: u32,
    pub summary: Vec<CategorySummary>,
    pub recent: Vec<Transaction>,
}

pub struct Service<S> {
    store: S,
    owner: Option<String>,
    cache: ViewCache,
}

impl<S> Service<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            owner: None,
            cache: ViewCache::new(),
        }
    }

    pub fn with_owner(store: S, owner: impl Into<String>) -> Self {
        let mut service = Self::new(store);
        service.owner = Some(owner.into());
        service
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = Some(owner.into());
    }

    /// Mutations and owner-keyed reads hard-fail without an owner.
    fn owner(&self) -> Result<&str, Error> {
        self.owner.as_deref().ok_or(Error::AuthRequired)
    }

    fn finish(&mut self, stale: Vec<View>) -> Mutation {
        self.cache.invalidate(&stale);
        Mutation { stale }
    }
}

impl<S: CategoryStore> Service<S> {
    pub async fn list_categories(&mut self) -> Result<Vec<Category>, Error> {
        if let Some(cached) = self.cache.categories() {
            return Ok(cached.to_vec());
        }
        let categories = self.store.list_categories().await?;
        self.cache.put_categories(categories.clone());
        Ok(categories)
    }

    pub async fn add_category(&mut self, name: &str) -> Result<Mutation, Error> {
        self.owner()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid("name", "category name is required"));
        }
        self.store.insert_category(name).await?;
        Ok(self.finish(vec![View::Categories, View::Budgets, View::Dashboard]))
    }

    pub async fn delete_category(&mut self, id: &str) -> Result<Mutation, Error> {
        self.owner()?;
        self.store.delete_category(id).await?;
        Ok(self.finish(vec![View::Categories, View::Budgets, View::Dashboard]))
    }

    /// Persist an explicit full ordering of category ids.
    ///
    /// One position write per category, issued concurrently. On any failure
    /// the already-committed rows are restored to their prior positions
    /// (best effort) and a single error is reported.
    pub async fn reorder_categories(&mut self, ordered_ids: &[String]) -> Result<Mutation, Error> {
        self.owner()?;
        let prior = self.store.list_categories().await?;
        let assignments = assign_sort_orders(ordered_ids);

        let store = &self.store;
        let results = join_all(
            assignments
                .iter()
                .map(|(id, position)| store.set_sort_order(id, *position)),
        )
        .await;

        if results.iter().all(|r| r.is_ok()) {
            return Ok(self.finish(vec![View::Categories, View::Budgets, View::Dashboard]));
        }

        // Compensate: put committed rows back where they were.
        let mut restored = 0usize;
        for ((id, _), result) in assignments.iter().zip(&results) {
            if result.is_ok() {
                if let Some(previous) = prior.iter().find(|c| c.id == *id) {
                    if let Err(e) = self.store.set_sort_order(id, previous.sort_order).await {
                        log::warn!("compensating write for category {id} failed: {e}");
                    } else {
                        restored += 1;
                    }
                }
            }
        }
        log::warn!("category reorder failed; restored {restored} committed row(s)");

        Err(results
            .into_iter()
            .find_map(Result::err)
            .unwrap_or_else(|| Error::Persistence("category reorder failed".to_string())))
    }
}

impl<S: BudgetStore> Service<S> {
    /// Set the planned amount for one `(category, month)` cell.
    /// Free-form input: non-numeric or negative amounts coerce to 0.
    pub async fn update_budget(
        &mut self,
        year: i32,
        month: u32,
        category_id: &str,
        raw_amount: &str,
    ) -> Result<Mutation, Error> {
        let owner = self.owner()?.to_string();
        let amount = coerce_amount(raw_amount);
        let row = budget_row(&owner, category_id, year, month, amount)
            .ok_or_else(|| Error::invalid("month", "month must be between 1 and 12"))?;
        self.store.upsert_budgets(std::slice::from_ref(&row)).await?;
        Ok(self.finish(vec![View::Budgets, View::Dashboard]))
    }

    /// Apply one amount to a category across all 12 months of a year,
    /// as a single batched upsert.
    pub async fn fill_year_budget(
        &mut self,
        year: i32,
        category_id: &str,
        raw_amount: &str,
    ) -> Result<Mutation, Error> {
        let owner = self.owner()?.to_string();
        let rows = year_rows(&owner, category_id, year, coerce_amount(raw_amount));
        self.store.upsert_budgets(&rows).await?;
        Ok(self.finish(vec![View::Budgets, View::Dashboard]))
    }
}

impl<S: BudgetStore + CategoryStore> Service<S> {
    /// The category × month grid for a year, cached until a mutation
    /// invalidates it.
    pub async fn budget_grid(&mut self, year: i32) -> Result<BudgetGrid, Error> {
        if let Some(grid) = self.cache.grid(year) {
            return Ok(grid.clone());
        }
        let owner = self.owner()?.to_string();
        let categories = self.store.list_categories().await?;
        let (from, to) = year_bounds(year);
        let rows = self.store.budgets_in_range(&owner, from, to).await?;
        let grid = BudgetGrid::build(year, &categories, &rows);
        self.cache.put_grid(grid.clone());
        Ok(grid)
    }
}

impl<S: TransactionStore> Service<S> {
    pub async fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Mutation, Error> {
        self.owner()?;
        let tx = draft.validate().map_err(Error::Validation)?;
        self.store.insert_transaction(&tx).await?;
        Ok(self.finish(vec![View::Dashboard]))
    }

    pub async fn update_transaction(
        &mut self,
        id: &str,
        draft: TransactionDraft,
    ) -> Result<Mutation, Error> {
        self.owner()?;
        let tx = draft.validate().map_err(Error::Validation)?;
        self.store.update_transaction(id, &tx).await?;
        Ok(self.finish(vec![View::Dashboard]))
    }

    pub async fn delete_transaction(&mut self, id: &str) -> Result<Mutation, Error> {
        self.owner()?;
        self.store.delete_transaction(id).await?;
        Ok(self.finish(vec![View::Dashboard]))
    }

    /// One month's ledger, newest first.
    pub async fn list_transactions(&self, year: i32, month: u32) -> Result<Vec<Transaction>, Error> {
        let window = MonthWindow::for_month(year, month)
            .ok_or_else(|| Error::invalid("month", "month must be between 1 and 12"))?;
        self.store.transactions_in_window(window, None).await
    }
}

impl<S: CategoryStore + BudgetStore + TransactionStore> Service<S> {
    /// Per-category spent vs. budgeted for one month, plus recent activity.
    pub async fn dashboard(&mut self, year: i32, month: u32) -> Result<DashboardData, Error> {
        let month_key = month_end(year, month)
            .ok_or_else(|| Error::invalid("month", "month must be between 1 and 12"))?;
        let window = MonthWindow::for_month(year, month)
            .ok_or_else(|| Error::invalid("month", "month must be between 1 and 12"))?;

        let transactions = self.store.transactions_in_window(window, None).await?;
        let recent = transactions.iter().take(RECENT_TRANSACTIONS).cloned().collect();

        if let Some(summary) = self.cache.summary(month_key) {
            return Ok(DashboardData {
                year,
                month,
                summary: summary.to_vec(),
                recent,
            });
        }

        let owner = self.owner()?.to_string();
        let categories = self.store.list_categories().await?;
        let budgets = self.store.budgets_in_range(&owner, month_key, month_key).await?;
        let summary = summarize(&categories, &budgets, &transactions);
        self.cache.put_summary(month_key, summary.clone());

        Ok(DashboardData {
            year,
            month,
            summary,
            recent,
        })
    }
}

impl<S: FixedCostStore> Service<S> {
    pub async fn add_fixed_cost(&mut self, draft: FixedCostDraft) -> Result<Mutation, Error> {
        let owner = self.owner()?.to_string();
        let cost = draft.validate().map_err(Error::Validation)?;
        self.store.insert_fixed_cost(&owner, &cost).await?;
        Ok(self.finish(vec![View::FixedCosts]))
    }

    pub async fn update_fixed_cost(
        &mut self,
        id: &str,
        draft: FixedCostDraft,
    ) -> Result<Mutation, Error> {
        let owner = self.owner()?.to_string();
        let cost = draft.validate().map_err(Error::Validation)?;
        self.store.update_fixed_cost(&owner, id, &cost).await?;
        Ok(self.finish(vec![View::FixedCosts]))
    }

    pub async fn delete_fixed_cost(&mut self, id: &str) -> Result<Mutation, Error> {
        let owner = self.owner()?.to_string();
        self.store.delete_fixed_cost(&owner, id).await?;
        Ok(self.finish(vec![View::FixedCosts]))
    }

    pub async fn list_fixed_costs(&self) -> Result<Vec<FixedCostTemplate>, Error> {
        let owner = self.owner()?;
        self.store.list_fixed_costs(owner).await
    }

    /// Ledger entries the owner's templates would produce on `date`.
    /// Pure projection: nothing is written.
    pub async fn due_fixed_costs(&self, date: NaiveDate) -> Result<Vec<NewTransaction>, Error> {
        let owner = self.owner()?;
        let templates = self.store.list_fixed_costs(owner).await?;
        Ok(templates
            .iter()
            .filter_map(|t| materialize(t, date))
            .collect())
    }
}

impl<S: ScheduleStore> Service<S> {
    /// Replace the holiday set wholesale: delete every holiday entry, then
    /// insert one per date with the shared title. Two store calls; the gap
    /// between them is a documented non-atomic window. An empty date set
    /// clears all holidays.
    pub async fn register_holidays(
        &mut self,
        dates: &[NaiveDate],
        title: &str,
    ) -> Result<Mutation, Error> {
        self.owner()?;
        self.store
            .delete_schedules_of_kind(ScheduleKind::Holiday)
            .await?;

        if !dates.is_empty() {
            let entries: Vec<NewScheduleEntry> = dates
                .iter()
                .map(|date| NewScheduleEntry {
                    date: *date,
                    title: title.to_string(),
                    kind: ScheduleKind::Holiday,
                })
                .collect();
            self.store.insert_schedules(&entries).await?;
        }

        Ok(self.finish(vec![View::Calendar]))
    }

    pub async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>, Error> {
        self.store.list_schedules().await
    }

    pub async fn holiday_dates(&self) -> Result<Vec<NaiveDate>, Error> {
        let entries = self.store.list_schedules().await?;
        Ok(holiday_dates(&entries))
    }
}
