use serde::Serialize;

use crate::date_utils::Month;
use crate::models::category::BudgetCategory;
use crate::models::money;

/// A charge that applies every month from `effective_at` onwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
    pub category: String,
    #[serde(rename = "price", serialize_with = "money::serialize_cents")]
    pub price_cents: i64,
    pub effective_at: Month,
}

impl RecurringTransaction {
    pub fn bucket(&self) -> BudgetCategory {
        BudgetCategory::from_label(&self.category)
    }
}

#[derive(Debug, Clone)]
pub struct NewRecurringTransaction {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub effective_at: Month,
}
