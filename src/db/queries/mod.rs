pub mod recurring_transactions;
pub mod settings;
pub mod transactions;
pub mod users;
