use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use crate::models::{NewRecurringTransaction, RecurringTransaction};

const RECURRING_COLUMNS: &str =
    "r.id, r.user_id, r.name, r.category, r.price_cents, r.effective_at";

fn map_recurring(row: &Row<'_>) -> rusqlite::Result<RecurringTransaction> {
    Ok(RecurringTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        price_cents: row.get(4)?,
        effective_at: row.get(5)?,
    })
}

/// Recurring transactions of a user. With `started_before`, only those whose
/// effective month begins strictly before that date.
pub fn list_recurring_transactions(
    conn: &Connection,
    user_id: i64,
    started_before: Option<NaiveDate>,
) -> rusqlite::Result<Vec<RecurringTransaction>> {
    let mut sql = format!(
        "SELECT {RECURRING_COLUMNS}
         FROM recurring_transactions r
         WHERE r.user_id = ?"
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

    if let Some(before) = started_before {
        sql.push_str(" AND r.effective_at < ?");
        params_vec.push(Box::new(before));
    }
    sql.push_str(" ORDER BY r.effective_at DESC, r.id DESC");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let recurring = stmt
        .query_map(params_refs.as_slice(), map_recurring)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(user_id, count = recurring.len(), "Listed recurring transactions");
    Ok(recurring)
}

pub fn get_recurring_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> rusqlite::Result<Option<RecurringTransaction>> {
    trace!(recurring_transaction_id = id, "Fetching recurring transaction");
    conn.query_row(
        &format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_transactions r
             WHERE r.id = ? AND r.user_id = ?"
        ),
        params![id, user_id],
        map_recurring,
    )
    .optional()
}

pub fn create_recurring_transaction(
    conn: &Connection,
    user_id: i64,
    recurring: &NewRecurringTransaction,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO recurring_transactions (user_id, name, category, price_cents, effective_at)
         VALUES (?, ?, ?, ?, ?)",
        params![
            user_id,
            recurring.name,
            recurring.category,
            recurring.price_cents,
            recurring.effective_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_recurring_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
    recurring: &NewRecurringTransaction,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE recurring_transactions
         SET name = ?, category = ?, price_cents = ?, effective_at = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            recurring.name,
            recurring.category,
            recurring.price_cents,
            recurring.effective_at,
            id,
            user_id,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_recurring_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM recurring_transactions WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    Ok(rows > 0)
}
