use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::CurrentUser;
use crate::date_utils::{Month, MonthParseError};
use crate::db::queries::recurring_transactions;
use crate::error::{AppError, AppResult};
use crate::handlers::JsonBody;
use crate::models::money;
use crate::models::{NewRecurringTransaction, RecurringTransaction};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransactionInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    /// `YYYY-MM`
    pub effective_at: String,
}

impl RecurringTransactionInput {
    fn to_new_recurring(&self) -> AppResult<NewRecurringTransaction> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Recurring transaction name is required".into(),
            ));
        }
        let price_cents = money::to_cents(self.price)
            .ok_or_else(|| AppError::Validation("Invalid price".into()))?;
        let effective_at: Month = self
            .effective_at
            .trim()
            .parse()
            .map_err(|e: MonthParseError| AppError::Validation(e.to_string()))?;

        Ok(NewRecurringTransaction {
            name: name.to_string(),
            category: self.category.trim().to_string(),
            price_cents,
            effective_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RecurringTransactionBatch {
    pub transactions: Vec<RecurringTransactionInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransactionList {
    /// Monthly total of all listed charges.
    pub amount_spent: f64,
    pub recurring_transactions: Vec<RecurringTransaction>,
}

impl RecurringTransactionList {
    fn new(recurring_transactions: Vec<RecurringTransaction>) -> Self {
        let total_cents = money::sum_cents(recurring_transactions.iter().map(|r| r.price_cents));
        Self {
            amount_spent: money::from_cents(total_cents),
            recurring_transactions,
        }
    }
}

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<RecurringTransactionList>> {
    let conn = state.db.get()?;
    let list = recurring_transactions::list_recurring_transactions(&conn, user.id, None)?;
    Ok(Json(RecurringTransactionList::new(list)))
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RecurringTransaction>> {
    let conn = state.db.get()?;
    recurring_transactions::get_recurring_transaction(&conn, user.id, id)?
        .map(Json)
        .ok_or_else(|| not_owned(id))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(batch): JsonBody<RecurringTransactionBatch>,
) -> AppResult<(StatusCode, Json<RecurringTransactionList>)> {
    let new_recurring = batch
        .transactions
        .iter()
        .map(RecurringTransactionInput::to_new_recurring)
        .collect::<AppResult<Vec<_>>>()?;
    debug!(user_id = user.id, count = new_recurring.len(), "Creating recurring transactions");

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;

    let mut created = Vec::with_capacity(new_recurring.len());
    for recurring in &new_recurring {
        let id = recurring_transactions::create_recurring_transaction(&tx, user.id, recurring)?;
        if let Some(stored) = recurring_transactions::get_recurring_transaction(&tx, user.id, id)? {
            created.push(stored);
        }
    }

    tx.commit()?;
    info!(user_id = user.id, count = created.len(), "Recurring transactions created");
    Ok((StatusCode::CREATED, Json(RecurringTransactionList::new(created))))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<RecurringTransactionInput>,
) -> AppResult<StatusCode> {
    let recurring = input.to_new_recurring()?;
    let conn = state.db.get()?;

    if !recurring_transactions::update_recurring_transaction(&conn, user.id, id, &recurring)? {
        return Err(not_owned(id));
    }
    info!(user_id = user.id, recurring_transaction_id = id, "Recurring transaction updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;

    if !recurring_transactions::delete_recurring_transaction(&conn, user.id, id)? {
        return Err(not_owned(id));
    }
    info!(user_id = user.id, recurring_transaction_id = id, "Recurring transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn not_owned(id: i64) -> AppError {
    AppError::Forbidden(format!("Recurring transaction {} is not accessible", id))
}
