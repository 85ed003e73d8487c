//! Dashboard summary: spent vs. budgeted per category for one month.

use std::collections::HashMap;

use serde::Serialize;

use crate::budget::BudgetRow;
use crate::category::Category;
use crate::ledger::Transaction;

/// Derived per-category numbers for one month.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategorySummary {
    pub category_id: String,
    pub name: String,
    pub budgeted: i64,
    pub spent: i64,
    pub remaining: i64,
    /// `round(spent / budgeted * 100)`; 0 when nothing is budgeted.
    pub percentage: i64,
}

/// One summary per category, in category order.
///
/// `budgets` are the rows for the month's exact key; `transactions` the
/// entries inside the month window. Categories missing on either side
/// default to 0, and uncategorized transactions count toward no category.
pub fn summarize(
    categories: &[Category],
    budgets: &[BudgetRow],
    transactions: &[Transaction],
) -> Vec<CategorySummary> {
    let mut spent_by_category: HashMap<&str, i64> = HashMap::new();
    for tx in transactions {
        if let Some(category_id) = &tx.category_id {
            *spent_by_category.entry(category_id.as_str()).or_default() += tx.amount;
        }
    }

    let mut budget_by_category: HashMap<&str, i64> = HashMap::new();
    for row in budgets {
        budget_by_category.insert(row.category_id.as_str(), row.amount);
    }

    categories
        .iter()
        .map(|cat| {
            let budgeted = budget_by_category.get(cat.id.as_str()).copied().unwrap_or(0);
            let spent = spent_by_category.get(cat.id.as_str()).copied().unwrap_or(0);
            let percentage = if budgeted > 0 {
                ((spent as f64 / budgeted as f64) * 100.0).round() as i64
            } else {
                0
            };
            CategorySummary {
                category_id: cat.id.clone(),
                name: cat.name.clone(),
                budgeted,
                spent,
                remaining: budgeted - spent,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::budget_row;
    use chrono::NaiveDate;

    fn cat(id: &str, name: &str, sort_order: i32) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            sort_order,
        }
    }

    fn tx(id: &str, amount: i64, category_id: Option<&str>) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            amount,
            description: None,
            category_id: category_id.map(|c| c.to_string()),
        }
    }

    #[test]
    fn test_percentage_rounds() {
        let categories = vec![cat("c1", "Food", 0)];
        let budgets = vec![budget_row("u1", "c1", 2024, 5, 1000).unwrap()];
        let transactions = vec![tx("t1", 250, Some("c1"))];

        let summary = summarize(&categories, &budgets, &transactions);
        assert_eq!(summary[0].percentage, 25);
        assert_eq!(summary[0].remaining, 750);
    }

    #[test]
    fn test_zero_budget_avoids_division() {
        let categories = vec![cat("c1", "Food", 0)];
        let transactions = vec![tx("t1", 500, Some("c1"))];

        let summary = summarize(&categories, &[], &transactions);
        assert_eq!(summary[0].budgeted, 0);
        assert_eq!(summary[0].spent, 500);
        assert_eq!(summary[0].percentage, 0);
        assert_eq!(summary[0].remaining, -500);
    }

    #[test]
    fn test_every_category_present_in_order() {
        let categories = vec![cat("c1", "Food", 0), cat("c2", "Rent", 1)];
        let summary = summarize(&categories, &[], &[]);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].category_id, "c1");
        assert_eq!(summary[1].category_id, "c2");
        assert_eq!(summary[1].spent, 0);
    }

    #[test]
    fn test_uncategorized_transactions_are_skipped() {
        let categories = vec![cat("c1", "Food", 0)];
        let transactions = vec![tx("t1", 300, Some("c1")), tx("t2", 999, None)];
        let summary = summarize(&categories, &[], &transactions);
        assert_eq!(summary[0].spent, 300);
    }
}
