pub mod category;
pub mod money;
pub mod overview;
pub mod recurring_transaction;
pub mod settings;
pub mod transaction;
pub mod user;

pub use category::BudgetCategory;
pub use overview::{CategoryOverview, CategoryOverviews, Overview};
pub use recurring_transaction::{NewRecurringTransaction, RecurringTransaction};
pub use settings::{BudgetSettings, NewBudgetSettings};
pub use transaction::{NewTransaction, Transaction};
pub use user::{NewUser, User};
