//! kakei-core: domain types and pure logic for the kakei budget tracker

pub mod budget;
pub mod category;
pub mod error;
pub mod fixed_cost;
pub mod ledger;
pub mod month;
pub mod schedule;
pub mod summary;
pub mod view;

pub use budget::{BudgetGrid, BudgetRow, GridRow, budget_row, coerce_amount, year_rows};
pub use category::{Category, assign_sort_orders, order_for_display};
pub use error::{Error, FieldError};
pub use fixed_cost::{FixedCostDraft, FixedCostTemplate, NewFixedCost, Recurrence, materialize};
pub use ledger::{NewTransaction, Transaction, TransactionDraft};
pub use month::{MonthWindow, days_in_month, month_end, year_bounds};
pub use schedule::{NewScheduleEntry, ScheduleEntry, ScheduleKind, holiday_dates};
pub use summary::{CategorySummary, summarize};
pub use view::View;
