use serde::{Deserialize, Serialize};

/// The three budget buckets every transaction is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetCategory {
    Needs,
    Wants,
    Savings,
}

impl BudgetCategory {
    /// Map a stored label to its bucket. Matching is exact; every label
    /// other than `Needs` or `Wants` counts as savings.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Needs" => BudgetCategory::Needs,
            "Wants" => BudgetCategory::Wants,
            _ => BudgetCategory::Savings,
        }
    }
}
