pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{create_in_memory_pool, create_pool, DbPool};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::date_utils::Month;

// Months are stored as the `YYYY-MM-DD` text of their first day so that
// plain string comparison in SQL orders them chronologically.
impl ToSql for Month {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_db_string()))
    }
}

impl FromSql for Month {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Month::from_db_string(text).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
