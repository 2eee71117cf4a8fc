use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use crate::date_utils::Month;
use crate::models::{BudgetSettings, NewBudgetSettings};

const SETTINGS_COLUMNS: &str = "id, user_id, income_cents, needs_percentage, wants_percentage,
     savings_percentage, effective_at";

fn map_settings(row: &Row<'_>) -> rusqlite::Result<BudgetSettings> {
    Ok(BudgetSettings {
        id: row.get(0)?,
        user_id: row.get(1)?,
        income_cents: row.get(2)?,
        needs_percentage: row.get(3)?,
        wants_percentage: row.get(4)?,
        savings_percentage: row.get(5)?,
        effective_at: row.get(6)?,
    })
}

/// The most recent settings version that is effective in `month`.
pub fn get_settings_effective_in(
    conn: &Connection,
    user_id: i64,
    month: Month,
) -> rusqlite::Result<Option<BudgetSettings>> {
    trace!(user_id, month = %month, "Resolving budget settings");
    conn.query_row(
        &format!(
            "SELECT {SETTINGS_COLUMNS} FROM budget_settings
             WHERE user_id = ? AND effective_at <= ?
             ORDER BY effective_at DESC, id DESC
             LIMIT 1"
        ),
        params![user_id, month],
        map_settings,
    )
    .optional()
}

/// Every settings version of a user, oldest first.
pub fn list_settings(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<BudgetSettings>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM budget_settings
         WHERE user_id = ?
         ORDER BY effective_at ASC, id ASC"
    ))?;
    let settings = stmt
        .query_map([user_id], map_settings)?
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = settings.len(), "Listed budget settings");
    Ok(settings)
}

/// Store a settings version, replacing any existing version of the same
/// user for the same effective month. Run inside a transaction so the
/// delete and insert land together.
pub fn replace_settings(
    conn: &Connection,
    user_id: i64,
    settings: &NewBudgetSettings,
) -> rusqlite::Result<i64> {
    let removed = conn.execute(
        "DELETE FROM budget_settings WHERE user_id = ? AND effective_at = ?",
        params![user_id, settings.effective_at],
    )?;
    if removed > 0 {
        debug!(user_id, month = %settings.effective_at, "Replacing budget settings");
    }

    conn.execute(
        "INSERT INTO budget_settings (user_id, income_cents, needs_percentage,
         wants_percentage, savings_percentage, effective_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            user_id,
            settings.income_cents,
            settings.needs_percentage,
            settings.wants_percentage,
            settings.savings_percentage,
            settings.effective_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
