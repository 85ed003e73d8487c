//! Logical read surfaces tracked for staleness after mutations.

use serde::Serialize;

/// The views a mutation can make stale. Mirrors the pages of the UI: every
/// mutation reports which of these must be re-fetched; it re-renders nothing
/// itself.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Budgets,
    Categories,
    FixedCosts,
    Calendar,
}
