pub mod budget_store;
pub mod overview;

pub use budget_store::BudgetStore;
pub use overview::{compute_overview, Aggregates, OverviewError, OverviewRequest, ResolvedSettings};
