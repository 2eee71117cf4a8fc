use chrono::NaiveDate;
use serde::Serialize;

use crate::models::category::BudgetCategory;
use crate::models::money;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
    pub category: String,
    #[serde(rename = "price", serialize_with = "money::serialize_cents")]
    pub price_cents: i64,
    pub created_at: NaiveDate,
    /// Legacy flag kept for clients that still send it.
    pub is_recurring: bool,
}

impl Transaction {
    pub fn bucket(&self) -> BudgetCategory {
        BudgetCategory::from_label(&self.category)
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub created_at: NaiveDate,
    pub is_recurring: bool,
}
