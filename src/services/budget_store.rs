use chrono::NaiveDate;
use rusqlite::Connection;

use crate::date_utils::{Month, MonthWindow};
use crate::db::queries::{recurring_transactions, settings, transactions};
use crate::models::{BudgetSettings, RecurringTransaction, Transaction};

/// Read access to the three record sets an overview is built from.
pub trait BudgetStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Most recent settings version with an effective month at or before `month`.
    fn settings_effective_in(
        &self,
        user_id: i64,
        month: Month,
    ) -> Result<Option<BudgetSettings>, Self::Error>;

    /// One-time transactions dated inside `window`.
    fn transactions_in(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> Result<Vec<Transaction>, Self::Error>;

    /// Recurring transactions whose effective month starts before `date`.
    fn recurring_started_before(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<RecurringTransaction>, Self::Error>;
}

impl BudgetStore for Connection {
    type Error = rusqlite::Error;

    fn settings_effective_in(
        &self,
        user_id: i64,
        month: Month,
    ) -> rusqlite::Result<Option<BudgetSettings>> {
        settings::get_settings_effective_in(self, user_id, month)
    }

    fn transactions_in(
        &self,
        user_id: i64,
        window: MonthWindow,
    ) -> rusqlite::Result<Vec<Transaction>> {
        let filter = transactions::TransactionFilter {
            from_date: Some(window.start),
            before_date: Some(window.end),
        };
        transactions::list_transactions(self, user_id, &filter)
    }

    fn recurring_started_before(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> rusqlite::Result<Vec<RecurringTransaction>> {
        recurring_transactions::list_recurring_transactions(self, user_id, Some(date))
    }
}
