use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use crate::models::{NewTransaction, Transaction};

#[derive(Debug, Default)]
pub struct TransactionFilter {
    /// Inclusive lower bound on `created_at`.
    pub from_date: Option<NaiveDate>,
    /// Exclusive upper bound on `created_at`.
    pub before_date: Option<NaiveDate>,
}

const TRANSACTION_COLUMNS: &str =
    "t.id, t.user_id, t.name, t.category, t.price_cents, t.created_at, t.is_recurring";

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        price_cents: row.get(4)?,
        created_at: row.get(5)?,
        is_recurring: row.get(6)?,
    })
}

pub fn list_transactions(
    conn: &Connection,
    user_id: i64,
    filter: &TransactionFilter,
) -> rusqlite::Result<Vec<Transaction>> {
    let mut sql = format!(
        "SELECT {TRANSACTION_COLUMNS}
         FROM transactions t
         WHERE t.user_id = ?"
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

    if let Some(from_date) = filter.from_date {
        sql.push_str(" AND t.created_at >= ?");
        params_vec.push(Box::new(from_date));
    }
    if let Some(before_date) = filter.before_date {
        sql.push_str(" AND t.created_at < ?");
        params_vec.push(Box::new(before_date));
    }
    sql.push_str(" ORDER BY t.created_at DESC, t.id DESC");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let transactions = stmt
        .query_map(params_refs.as_slice(), map_transaction)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(user_id, count = transactions.len(), "Listed transactions");
    Ok(transactions)
}

pub fn get_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> rusqlite::Result<Option<Transaction>> {
    trace!(transaction_id = id, "Fetching transaction");
    conn.query_row(
        &format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions t
             WHERE t.id = ? AND t.user_id = ?"
        ),
        params![id, user_id],
        map_transaction,
    )
    .optional()
}

pub fn create_transaction(
    conn: &Connection,
    user_id: i64,
    transaction: &NewTransaction,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (user_id, name, category, price_cents, created_at, is_recurring)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            user_id,
            transaction.name,
            transaction.category,
            transaction.price_cents,
            transaction.created_at,
            transaction.is_recurring,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace every field of a transaction owned by `user_id`.
/// Returns false when no such transaction exists for that user.
pub fn update_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
    transaction: &NewTransaction,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE transactions
         SET name = ?, category = ?, price_cents = ?, created_at = ?, is_recurring = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            transaction.name,
            transaction.category,
            transaction.price_cents,
            transaction.created_at,
            transaction.is_recurring,
            id,
            user_id,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM transactions WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    Ok(rows > 0)
}
