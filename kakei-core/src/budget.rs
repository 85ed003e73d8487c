//! Budget rows and the category × month planning grid.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::month::month_end;

/// One planned amount, keyed by `(owner, category, month_key)`.
/// `month_key` is always the last day of the budget month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetRow {
    pub owner_id: String,
    pub category_id: String,
    pub month_key: NaiveDate,
    pub amount: i64,
}

/// Coerce free-form amount input to a non-negative integer.
///
/// Thousands separators are dropped; non-numeric or negative input maps to 0.
pub fn coerce_amount(raw: &str) -> i64 {
    let cleaned = raw.trim().replace(',', "");
    match cleaned.parse::<i64>() {
        Ok(n) if n >= 0 => n,
        _ => 0,
    }
}

/// The upsert row for a single `(category, month)` cell.
/// Returns `None` for an out-of-range month.
pub fn budget_row(
    owner_id: &str,
    category_id: &str,
    year: i32,
    month: u32,
    amount: i64,
) -> Option<BudgetRow> {
    let month_key = month_end(year, month)?;
    Some(BudgetRow {
        owner_id: owner_id.to_string(),
        category_id: category_id.to_string(),
        month_key,
        amount: amount.max(0),
    })
}

/// The 12 upsert rows for apply-to-year: one per month, same amount,
/// each keyed exactly as the single-cell path.
pub fn year_rows(owner_id: &str, category_id: &str, year: i32, amount: i64) -> Vec<BudgetRow> {
    (1..=12)
        .filter_map(|month| budget_row(owner_id, category_id, year, month, amount))
        .collect()
}

/// One grid row: a category and its 12 monthly amounts (index 0 = January).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GridRow {
    pub category_id: String,
    pub category_name: String,
    pub months: [i64; 12],
}

/// The category × month amount grid for one year.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BudgetGrid {
    pub year: i32,
    pub rows: Vec<GridRow>,
}

impl BudgetGrid {
    /// Build the grid from a year's budget rows.
    ///
    /// Every category appears in category order, cells defaulting to 0; the
    /// month is the calendar month component of the stored `month_key`.
    pub fn build(year: i32, categories: &[Category], rows: &[BudgetRow]) -> Self {
        let mut amounts: HashMap<&str, [i64; 12]> = HashMap::new();
        for row in rows {
            if row.month_key.year() != year {
                continue;
            }
            let month_index = (row.month_key.month() - 1) as usize;
            amounts.entry(row.category_id.as_str()).or_insert([0; 12])[month_index] = row.amount;
        }

        let grid_rows = categories
            .iter()
            .map(|cat| GridRow {
                category_id: cat.id.clone(),
                category_name: cat.name.clone(),
                months: amounts.get(cat.id.as_str()).copied().unwrap_or([0; 12]),
            })
            .collect();

        Self {
            year,
            rows: grid_rows,
        }
    }

    /// Amount for `(category, month 1-12)`, if the category is in the grid.
    pub fn amount(&self, category_id: &str, month: u32) -> Option<i64> {
        if !(1..=12).contains(&month) {
            return None;
        }
        self.rows
            .iter()
            .find(|r| r.category_id == category_id)
            .map(|r| r.months[(month - 1) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: &str, name: &str, sort_order: i32) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            sort_order,
        }
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("1,200"), 1200);
        assert_eq!(coerce_amount(" 300 "), 300);
        assert_eq!(coerce_amount("abc"), 0);
        assert_eq!(coerce_amount("-5"), 0);
        assert_eq!(coerce_amount(""), 0);
    }

    #[test]
    fn test_budget_row_keys_on_month_end() {
        let row = budget_row("u1", "c1", 2024, 2, 5000).unwrap();
        assert_eq!(row.month_key, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_year_rows_matches_single_cell_keys() {
        let rows = year_rows("u1", "c1", 2024, 800);
        assert_eq!(rows.len(), 12);
        for (i, row) in rows.iter().enumerate() {
            let single = budget_row("u1", "c1", 2024, i as u32 + 1, 800).unwrap();
            assert_eq!(row.month_key, single.month_key);
            assert_eq!(row.amount, 800);
        }
    }

    #[test]
    fn test_grid_defaults_missing_cells_to_zero() {
        let categories = vec![cat("c1", "Food", 0), cat("c2", "Rent", 1)];
        let rows = vec![budget_row("u1", "c1", 2024, 3, 450).unwrap()];
        let grid = BudgetGrid::build(2024, &categories, &rows);

        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.amount("c1", 3), Some(450));
        assert_eq!(grid.amount("c1", 4), Some(0));
        // Category with no rows still appears, all zero.
        assert_eq!(grid.rows[1].category_id, "c2");
        assert_eq!(grid.rows[1].months, [0; 12]);
    }

    #[test]
    fn test_row_serializes_month_key_as_plain_date() {
        let row = budget_row("u1", "c1", 2024, 2, 5000).unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["month_key"], "2024-02-29");
        assert_eq!(json["amount"], 5000);
    }

    #[test]
    fn test_grid_ignores_rows_outside_the_year() {
        let categories = vec![cat("c1", "Food", 0)];
        let rows = vec![budget_row("u1", "c1", 2023, 12, 999).unwrap()];
        let grid = BudgetGrid::build(2024, &categories, &rows);
        assert_eq!(grid.rows[0].months, [0; 12]);
    }
}
