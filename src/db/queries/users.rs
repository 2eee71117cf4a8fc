use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use crate::models::User;

const USER_COLUMNS: &str = "id, first_name, last_name, phone_number, password_hash";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone_number: row.get(3)?,
        password_hash: row.get(4)?,
    })
}

pub fn get_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    trace!(user_id = id, "Fetching user");
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
        [id],
        map_user,
    )
    .optional()
}

pub fn get_user_by_phone(conn: &Connection, phone_number: &str) -> rusqlite::Result<Option<User>> {
    trace!(phone_number, "Fetching user by phone number");
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE phone_number = ?"),
        [phone_number],
        map_user,
    )
    .optional()
}

pub fn create_user(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    phone_number: &str,
    password_hash: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (first_name, last_name, phone_number, password_hash)
         VALUES (?, ?, ?, ?)",
        params![first_name, last_name, phone_number, password_hash],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id = id, "Created user");
    Ok(id)
}
