use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::CurrentUser;
use crate::date_utils::{parse_date, Month};
use crate::db::queries::transactions;
use crate::error::{AppError, AppResult};
use crate::handlers::{DateParams, JsonBody, QueryParams};
use crate::models::money;
use crate::models::{NewTransaction, Transaction};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    /// `YYYY-MM-DD`
    pub created_at: String,
    #[serde(default)]
    pub is_recurring: bool,
}

impl TransactionInput {
    pub(crate) fn to_new_transaction(&self) -> AppResult<NewTransaction> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Transaction name is required".into()));
        }
        let price_cents = money::to_cents(self.price)
            .ok_or_else(|| AppError::Validation("Invalid price".into()))?;
        let created_at = parse_date(self.created_at.trim()).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid createdAt '{}', expected YYYY-MM-DD",
                self.created_at
            ))
        })?;

        Ok(NewTransaction {
            name: name.to_string(),
            category: self.category.trim().to_string(),
            price_cents,
            created_at,
            is_recurring: self.is_recurring,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionBatch {
    pub transactions: Vec<TransactionInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionList {
    pub amount_spent: f64,
    pub transactions: Vec<Transaction>,
}

/// The user's transactions, optionally limited to the month in `?date=YYYY-MM`.
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    QueryParams(params): QueryParams<DateParams>,
) -> AppResult<Json<TransactionList>> {
    let mut filter = transactions::TransactionFilter::default();
    if let Some(raw) = params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        let month: Month = raw
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM", raw)))?;
        let window = month.window();
        filter.from_date = Some(window.start);
        filter.before_date = Some(window.end);
    }

    let conn = state.db.get()?;
    let list = transactions::list_transactions(&conn, user.id, &filter)?;
    let total_cents = money::sum_cents(list.iter().map(|t| t.price_cents));

    Ok(Json(TransactionList {
        amount_spent: money::from_cents(total_cents),
        transactions: list,
    }))
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Transaction>> {
    let conn = state.db.get()?;
    transactions::get_transaction(&conn, user.id, id)?
        .map(Json)
        .ok_or_else(|| not_owned(id))
}

/// Create a batch of transactions. Either all are stored or none.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(batch): JsonBody<TransactionBatch>,
) -> AppResult<(StatusCode, Json<TransactionList>)> {
    let new_transactions = batch
        .transactions
        .iter()
        .map(TransactionInput::to_new_transaction)
        .collect::<AppResult<Vec<_>>>()?;
    debug!(user_id = user.id, count = new_transactions.len(), "Creating transactions");

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;

    let mut created = Vec::with_capacity(new_transactions.len());
    for new_transaction in &new_transactions {
        let id = transactions::create_transaction(&tx, user.id, new_transaction)?;
        if let Some(transaction) = transactions::get_transaction(&tx, user.id, id)? {
            created.push(transaction);
        }
    }

    tx.commit()?;
    info!(user_id = user.id, count = created.len(), "Transactions created");

    let total_cents = money::sum_cents(created.iter().map(|t| t.price_cents));
    Ok((
        StatusCode::CREATED,
        Json(TransactionList {
            amount_spent: money::from_cents(total_cents),
            transactions: created,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<TransactionInput>,
) -> AppResult<StatusCode> {
    let new_transaction = input.to_new_transaction()?;
    let conn = state.db.get()?;

    if !transactions::update_transaction(&conn, user.id, id, &new_transaction)? {
        return Err(not_owned(id));
    }
    info!(user_id = user.id, transaction_id = id, "Transaction updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;

    if !transactions::delete_transaction(&conn, user.id, id)? {
        return Err(not_owned(id));
    }
    info!(user_id = user.id, transaction_id = id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

// Absent and foreign records are indistinguishable to the caller.
fn not_owned(id: i64) -> AppError {
    AppError::Forbidden(format!("Transaction {} is not accessible", id))
}
