//! Spending categories and their explicit ordering.

use serde::{Deserialize, Serialize};

/// A spending category. Names are unique per installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// 0-based display position, rewritten wholesale on reorder.
    pub sort_order: i32,
}

/// Sort a category list the way every page renders it: explicit position
/// first, name as the tiebreak.
pub fn order_for_display(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    categories
}

/// 0-based sort orders for an explicit full ordering of category IDs.
///
/// The input must be a permutation of all existing IDs; that is the caller's
/// contract, not validated here.
pub fn assign_sort_orders(ordered_ids: &[String]) -> Vec<(&str, i32)> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(position, id)| (id.as_str(), position as i32))
        .collect()
}
