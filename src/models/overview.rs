use serde::Serialize;

use crate::date_utils::Month;
use crate::models::{RecurringTransaction, Transaction};

/// Spend against allowance for one budget bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOverview {
    pub spent: f64,
    pub allowed: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOverviews {
    pub needs: CategoryOverview,
    pub wants: CategoryOverview,
    pub savings: CategoryOverview,
}

/// The monthly report. Computed on every request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub month: Month,
    pub header: String,
    pub amount_spent: f64,
    pub monthly_income: f64,
    pub total_percentage: f64,
    pub days_left: u32,
    pub show_info: bool,
    pub show_transactions: bool,
    pub settings: CategoryOverviews,
    pub transactions: Vec<Transaction>,
    pub recurring_transactions: Vec<RecurringTransaction>,
}
