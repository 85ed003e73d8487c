//! Trait seams over the hosted relational store.
//!
//! Each trait exposes the upsert/select/delete primitives one entity needs.
//! The store is assumed to enforce the uniqueness constraints named on the
//! types; violations surface as `Error::Conflict`.

use chrono::NaiveDate;
use kakei_core::{
    BudgetRow, Category, Error, FixedCostTemplate, MonthWindow, NewFixedCost, NewScheduleEntry,
    NewTransaction, ScheduleEntry, ScheduleKind, Transaction,
};

/// Creates, orders and removes spending categories.
pub trait CategoryStore {
    /// Insert a category with the next free position.
    /// Duplicate names are a `Conflict`.
    async fn insert_category(&self, name: &str) -> Result<Category, Error>;

    async fn delete_category(&self, id: &str) -> Result<(), Error>;

    /// All categories ordered by `(sort_order, name)`.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Single-row position write; reordering issues one per category.
    async fn set_sort_order(&self, id: &str, sort_order: i32) -> Result<(), Error>;
}

/// Planned monthly amounts, conflict-keyed by `(owner, category, month_key)`.
pub trait BudgetStore {
    /// Batched conflict-keyed write. One store request: the batch commits
    /// whole or not at all.
    async fn upsert_budgets(&self, rows: &[BudgetRow]) -> Result<(), Error>;

    /// One owner's rows with `month_key` in `[from, to]` (inclusive).
    async fn budgets_in_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BudgetRow>, Error>;
}

/// The dated ledger of monetary entries.
pub trait TransactionStore {
    /// Insert and return the stored entry (the store issues the id).
    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction, Error>;

    async fn update_transaction(&self, id: &str, tx: &NewTransaction) -> Result<(), Error>;

    async fn delete_transaction(&self, id: &str) -> Result<(), Error>;

    /// Entries with `date` in the half-open window, newest first,
    /// optionally capped.
    async fn transactions_in_window(
        &self,
        window: MonthWindow,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, Error>;
}

/// Owner-scoped recurring-charge templates.
pub trait FixedCostStore {
    async fn insert_fixed_cost(
        &self,
        owner_id: &str,
        cost: &NewFixedCost,
    ) -> Result<FixedCostTemplate, Error>;

    /// Updates only the owner's own row.
    async fn update_fixed_cost(
        &self,
        owner_id: &str,
        id: &str,
        cost: &NewFixedCost,
    ) -> Result<(), Error>;

    async fn delete_fixed_cost(&self, owner_id: &str, id: &str) -> Result<(), Error>;

    /// The owner's templates ordered by `execution_day`.
    async fn list_fixed_costs(&self, owner_id: &str) -> Result<Vec<FixedCostTemplate>, Error>;
}

/// Dated calendar annotations.
pub trait ScheduleStore {
    async fn insert_schedules(&self, entries: &[NewScheduleEntry]) -> Result<(), Error>;

    async fn delete_schedules_of_kind(&self, kind: ScheduleKind) -> Result<(), Error>;

    async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>, Error>;
}
