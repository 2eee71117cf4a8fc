//! Monthly budget overview.
//!
//! An overview is built in four steps: parse the requested month, resolve
//! the settings version effective in that month, aggregate one-time and
//! recurring spend into the three budget buckets, then compose the report.
//! Any failure aborts the whole computation; no partial report is returned.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error};

use crate::clock::Clock;
use crate::date_utils::{days_left_in_month, Month};
use crate::models::money::{from_cents, round2, sum_cents};
use crate::models::{
    BudgetCategory, BudgetSettings, CategoryOverview, CategoryOverviews, Overview,
    RecurringTransaction, Transaction, User,
};
use crate::services::budget_store::BudgetStore;

pub const HEADER_OVER_BUDGET: &str = "Over Budget";
pub const HEADER_WELL_DONE: &str = "Well Done!";

#[derive(Error, Debug)]
pub enum OverviewError {
    #[error("malformed date parameter '{0}'")]
    MalformedDate(String),

    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> OverviewError {
    OverviewError::Store(Box::new(err))
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The month being viewed, and how it relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewRequest {
    pub month: Month,
    pub today: NaiveDate,
    pub is_current_month: bool,
}

impl OverviewRequest {
    /// `date` is an optional `YYYY-MM`; absent or blank means the current month.
    pub fn parse(date: Option<&str>, today: NaiveDate) -> Result<Self, OverviewError> {
        let current = Month::containing(today);
        let month = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => raw
                .parse::<Month>()
                .map_err(|_| OverviewError::MalformedDate(raw.to_string()))?,
            None => current,
        };

        Ok(Self {
            month,
            today,
            is_current_month: month.key() == current.key(),
        })
    }
}

// ---------------------------------------------------------------------------
// Settings resolution
// ---------------------------------------------------------------------------

/// Outcome of looking up the settings version for a month.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSettings {
    Found(BudgetSettings),
    /// No version is effective yet; income and every allowance count as zero.
    Missing,
}

impl ResolvedSettings {
    pub fn income_cents(&self) -> i64 {
        match self {
            ResolvedSettings::Found(settings) => settings.income_cents,
            ResolvedSettings::Missing => 0,
        }
    }

    pub fn allowed_cents(&self, category: BudgetCategory) -> i64 {
        match self {
            ResolvedSettings::Found(settings) => settings.allowed_cents(category),
            ResolvedSettings::Missing => 0,
        }
    }

    pub fn into_option(self) -> Option<BudgetSettings> {
        match self {
            ResolvedSettings::Found(settings) => Some(settings),
            ResolvedSettings::Missing => None,
        }
    }
}

pub fn resolve_settings<S: BudgetStore + ?Sized>(
    store: &S,
    user_id: i64,
    month: Month,
) -> Result<ResolvedSettings, OverviewError> {
    let resolved = match store
        .settings_effective_in(user_id, month)
        .map_err(store_error)?
    {
        Some(settings) => ResolvedSettings::Found(settings),
        None => ResolvedSettings::Missing,
    };
    debug!(
        user_id,
        month = %month,
        found = matches!(resolved, ResolvedSettings::Found(_)),
        "Resolved budget settings"
    );
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Spend per budget bucket, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketTotals {
    pub needs: i64,
    pub wants: i64,
    pub savings: i64,
}

impl BucketTotals {
    pub fn add(&mut self, category: BudgetCategory, cents: i64) {
        match category {
            BudgetCategory::Needs => self.needs = self.needs.saturating_add(cents),
            BudgetCategory::Wants => self.wants = self.wants.saturating_add(cents),
            BudgetCategory::Savings => self.savings = self.savings.saturating_add(cents),
        }
    }

    pub fn get(&self, category: BudgetCategory) -> i64 {
        match category {
            BudgetCategory::Needs => self.needs,
            BudgetCategory::Wants => self.wants,
            BudgetCategory::Savings => self.savings,
        }
    }

    pub fn total(&self) -> i64 {
        sum_cents([self.needs, self.wants, self.savings])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub spent: BucketTotals,
    pub transactions: Vec<Transaction>,
    pub recurring_transactions: Vec<RecurringTransaction>,
}

impl Aggregates {
    /// Sum both sources into buckets. The caller is responsible for having
    /// selected only the records that apply to the month.
    pub fn from_records(
        transactions: Vec<Transaction>,
        recurring_transactions: Vec<RecurringTransaction>,
    ) -> Self {
        let mut spent = BucketTotals::default();
        for transaction in &transactions {
            spent.add(transaction.bucket(), transaction.price_cents);
        }
        for recurring in &recurring_transactions {
            spent.add(recurring.bucket(), recurring.price_cents);
        }

        Self {
            spent,
            transactions,
            recurring_transactions,
        }
    }
}

pub fn aggregate<S: BudgetStore + ?Sized>(
    store: &S,
    user_id: i64,
    month: Month,
) -> Result<Aggregates, OverviewError> {
    let window = month.window();
    let transactions = store
        .transactions_in(user_id, window)
        .map_err(store_error)?;
    let recurring = store
        .recurring_started_before(user_id, window.end)
        .map_err(store_error)?;

    let aggregates = Aggregates::from_records(transactions, recurring);
    debug!(
        user_id,
        month = %month,
        transactions = aggregates.transactions.len(),
        recurring = aggregates.recurring_transactions.len(),
        total_cents = aggregates.spent.total(),
        "Aggregated spend"
    );
    Ok(aggregates)
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// `part / whole * 100`, rounded to two decimals; zero when `whole` is zero.
fn percentage_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

fn category_overview(
    settings: &ResolvedSettings,
    spent: &BucketTotals,
    category: BudgetCategory,
) -> CategoryOverview {
    let spent_cents = spent.get(category);
    let allowed_cents = settings.allowed_cents(category);
    CategoryOverview {
        spent: from_cents(spent_cents),
        allowed: from_cents(allowed_cents),
        percentage: percentage_of(spent_cents, allowed_cents),
    }
}

/// Build the report. Pure: identical inputs give identical output.
pub fn compose(
    settings: &ResolvedSettings,
    aggregates: Aggregates,
    request: &OverviewRequest,
    first_name: &str,
) -> Overview {
    let income_cents = settings.income_cents();
    let spent_cents = aggregates.spent.total();

    let (header, show_info, show_transactions) = if request.is_current_month {
        (format!("Hello, {}", first_name), true, false)
    } else if spent_cents > income_cents {
        (HEADER_OVER_BUDGET.to_string(), false, true)
    } else {
        (HEADER_WELL_DONE.to_string(), false, true)
    };

    Overview {
        month: request.month,
        header,
        amount_spent: from_cents(spent_cents),
        monthly_income: from_cents(income_cents),
        total_percentage: percentage_of(spent_cents, income_cents),
        // Always the real current month, whichever month is viewed.
        days_left: days_left_in_month(request.today),
        show_info,
        show_transactions,
        settings: CategoryOverviews {
            needs: category_overview(settings, &aggregates.spent, BudgetCategory::Needs),
            wants: category_overview(settings, &aggregates.spent, BudgetCategory::Wants),
            savings: category_overview(settings, &aggregates.spent, BudgetCategory::Savings),
        },
        transactions: aggregates.transactions,
        recurring_transactions: aggregates.recurring_transactions,
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the overview of `user` for the month in `date` (`YYYY-MM`, or the
/// current month when absent).
pub fn compute_overview<S: BudgetStore + ?Sized>(
    store: &S,
    clock: &dyn Clock,
    user: &User,
    date: Option<&str>,
) -> Result<Overview, OverviewError> {
    let request = OverviewRequest::parse(date, clock.today())?;

    let result = resolve_settings(store, user.id, request.month).and_then(|settings| {
        let aggregates = aggregate(store, user.id, request.month)?;
        Ok(compose(&settings, aggregates, &request, &user.first_name))
    });

    if let Err(ref e) = result {
        error!(
            user_id = user.id,
            phone_number = %user.phone_number,
            month = %request.month,
            error = %e,
            "Overview computation failed"
        );
    }
    result
}
