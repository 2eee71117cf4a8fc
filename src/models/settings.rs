use serde::Serialize;

use crate::date_utils::Month;
use crate::models::category::BudgetCategory;
use crate::models::money;

/// One version of a user's monthly budget, effective from `effective_at`
/// until a later version takes over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSettings {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    #[serde(rename = "income", serialize_with = "money::serialize_cents")]
    pub income_cents: i64,
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_percentage: f64,
    pub effective_at: Month,
}

impl BudgetSettings {
    pub fn percentage_for(&self, category: BudgetCategory) -> f64 {
        match category {
            BudgetCategory::Needs => self.needs_percentage,
            BudgetCategory::Wants => self.wants_percentage,
            BudgetCategory::Savings => self.savings_percentage,
        }
    }

    /// Monthly allowance for a bucket in cents.
    pub fn allowed_cents(&self, category: BudgetCategory) -> i64 {
        (self.income_cents as f64 * self.percentage_for(category)).round() as i64
    }
}

#[derive(Debug, Clone)]
pub struct NewBudgetSettings {
    pub income_cents: i64,
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_percentage: f64,
    pub effective_at: Month,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_cents() {
        let settings = BudgetSettings {
            id: 1,
            user_id: 1,
            income_cents: 300_000,
            needs_percentage: 0.5,
            wants_percentage: 0.3,
            savings_percentage: 0.2,
            effective_at: Month::new(2024, 1).unwrap(),
        };
        assert_eq!(settings.allowed_cents(BudgetCategory::Needs), 150_000);
        assert_eq!(settings.allowed_cents(BudgetCategory::Wants), 90_000);
        assert_eq!(settings.allowed_cents(BudgetCategory::Savings), 60_000);
    }
}
