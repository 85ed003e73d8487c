//! In-memory store: full trait coverage over mutex-guarded maps.
//!
//! Backs the service integration tests and offline runs. Ids are synthetic
//! and sequential; batch upserts are all-or-nothing like the hosted store's.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use kakei_core::{
    BudgetRow, Category, Error, FixedCostTemplate, MonthWindow, NewFixedCost, NewScheduleEntry,
    NewTransaction, ScheduleEntry, ScheduleKind, Transaction, order_for_display,
};

use crate::store::{BudgetStore, CategoryStore, FixedCostStore, ScheduleStore, TransactionStore};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    categories: Vec<Category>,
    /// (owner, category, month_key) -> amount. The map key IS the conflict key.
    budgets: BTreeMap<(String, String, NaiveDate), i64>,
    transactions: Vec<Transaction>,
    fixed_costs: Vec<FixedCostTemplate>,
    schedules: Vec<ScheduleEntry>,
    /// Test hook: category id whose sort-order writes fail.
    fail_sort_order_for: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic mid-write can only leave whole values behind, so a poisoned
    // lock is still safe to read through.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(inner: &mut Inner, prefix: &str) -> String {
        inner.next_id += 1;
        format!("{}-{}", prefix, inner.next_id)
    }

    /// Arm a write failure for one category's sort-order updates.
    /// Test hook for the reorder compensation path.
    pub fn fail_sort_order_for(&self, id: &str) {
        self.lock().fail_sort_order_for = Some(id.to_string());
    }
}

impl CategoryStore for MemoryStore {
    async fn insert_category(&self, name: &str) -> Result<Category, Error> {
        let mut inner = self.lock();
        if inner.categories.iter().any(|c| c.name == name) {
            return Err(Error::Conflict(format!("category \"{name}\" already exists")));
        }
        let category = Category {
            id: Self::next_id(&mut inner, "cat"),
            name: name.to_string(),
            sort_order: inner.categories.len() as i32,
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: &str) -> Result<(), Error> {
        self.lock().categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        Ok(order_for_display(self.lock().categories.clone()))
    }

    async fn set_sort_order(&self, id: &str, sort_order: i32) -> Result<(), Error> {
        let mut inner = self.lock();
        if inner.fail_sort_order_for.as_deref() == Some(id) {
            return Err(Error::Persistence(format!("write rejected for category {id}")));
        }
        match inner.categories.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                category.sort_order = sort_order;
                Ok(())
            }
            None => Err(Error::Persistence(format!("no category with id {id}"))),
        }
    }
}

impl BudgetStore for MemoryStore {
    async fn upsert_budgets(&self, rows: &[BudgetRow]) -> Result<(), Error> {
        let mut inner = self.lock();
        for row in rows {
            inner.budgets.insert(
                (row.owner_id.clone(), row.category_id.clone(), row.month_key),
                row.amount,
            );
        }
        Ok(())
    }

    async fn budgets_in_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BudgetRow>, Error> {
        let inner = self.lock();
        Ok(inner
            .budgets
            .iter()
            .filter(|((owner, _, month_key), _)| {
                owner == owner_id && (from..=to).contains(month_key)
            })
            .map(|((owner, category, month_key), amount)| BudgetRow {
                owner_id: owner.clone(),
                category_id: category.clone(),
                month_key: *month_key,
                amount: *amount,
            })
            .collect())
    }
}

impl TransactionStore for MemoryStore {
    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction, Error> {
        let mut inner = self.lock();
        let stored = Transaction {
            id: Self::next_id(&mut inner, "tx"),
            date: tx.date,
            amount: tx.amount,
            description: tx.description.clone(),
            category_id: tx.category_id.clone(),
        };
        inner.transactions.push(stored.clone());
        Ok(stored)
    }

    async fn update_transaction(&self, id: &str, tx: &NewTransaction) -> Result<(), Error> {
        let mut inner = self.lock();
        match inner.transactions.iter_mut().find(|t| t.id == id) {
            Some(stored) => {
                stored.date = tx.date;
                stored.amount = tx.amount;
                stored.description = tx.description.clone();
                stored.category_id = tx.category_id.clone();
                Ok(())
            }
            None => Err(Error::Persistence(format!("no transaction with id {id}"))),
        }
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), Error> {
        self.lock().transactions.retain(|t| t.id != id);
        Ok(())
    }

    async fn transactions_in_window(
        &self,
        window: MonthWindow,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, Error> {
        let inner = self.lock();
        let mut matching: Vec<Transaction> = inner
            .transactions
            .iter()
            .filter(|t| window.contains(t.date))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(n) = limit {
            matching.truncate(n);
        }
        Ok(matching)
    }
}

impl FixedCostStore for MemoryStore {
    async fn insert_fixed_cost(
        &self,
        owner_id: &str,
        cost: &NewFixedCost,
    ) -> Result<FixedCostTemplate, Error> {
        let mut inner = self.lock();
        let stored = FixedCostTemplate {
            id: Self::next_id(&mut inner, "fc"),
            owner_id: owner_id.to_string(),
            description: cost.description.clone(),
            amount: cost.amount,
            category_id: cost.category_id.clone(),
            recurrence: cost.recurrence,
            execution_day: cost.execution_day,
        };
        inner.fixed_costs.push(stored.clone());
        Ok(stored)
    }

    async fn update_fixed_cost(
        &self,
        owner_id: &str,
        id: &str,
        cost: &NewFixedCost,
    ) -> Result<(), Error> {
        let mut inner = self.lock();
        match inner
            .fixed_costs
            .iter_mut()
            .find(|f| f.id == id && f.owner_id == owner_id)
        {
            Some(stored) => {
                stored.description = cost.description.clone();
                stored.amount = cost.amount;
                stored.category_id = cost.category_id.clone();
                stored.recurrence = cost.recurrence;
                stored.execution_day = cost.execution_day;
                Ok(())
            }
            None => Err(Error::Persistence(format!("no fixed cost with id {id}"))),
        }
    }

    async fn delete_fixed_cost(&self, owner_id: &str, id: &str) -> Result<(), Error> {
        self.lock()
            .fixed_costs
            .retain(|f| !(f.id == id && f.owner_id == owner_id));
        Ok(())
    }

    async fn list_fixed_costs(&self, owner_id: &str) -> Result<Vec<FixedCostTemplate>, Error> {
        let inner = self.lock();
        let mut costs: Vec<FixedCostTemplate> = inner
            .fixed_costs
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        costs.sort_by_key(|f| f.execution_day);
        Ok(costs)
    }
}

impl ScheduleStore for MemoryStore {
    async fn insert_schedules(&self, entries: &[NewScheduleEntry]) -> Result<(), Error> {
        let mut inner = self.lock();
        for entry in entries {
            let id = Self::next_id(&mut inner, "sch");
            inner.schedules.push(ScheduleEntry {
                id,
                date: entry.date,
                title: entry.title.clone(),
                kind: entry.kind,
            });
        }
        Ok(())
    }

    async fn delete_schedules_of_kind(&self, kind: ScheduleKind) -> Result<(), Error> {
        self.lock().schedules.retain(|s| s.kind != kind);
        Ok(())
    }

    async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>, Error> {
        Ok(self.lock().schedules.clone())
    }
}
