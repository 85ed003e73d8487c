//! kakei-store: store traits, the hosted-store REST client, an in-memory
//! store, the view cache, and the service operations that compose them.

pub mod cache;
pub mod memory;
pub mod rest;
pub mod service;
pub mod store;

pub use cache::ViewCache;
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use service::{DashboardData, Mutation, Service};
pub use store::{BudgetStore, CategoryStore, FixedCostStore, ScheduleStore, TransactionStore};
