//! Additive, idempotent schema setup for the `interview` table.

use anyhow::{Context, Result};
use sqlx::AnyPool;
use tracing::{debug, info};

use crate::db::Dialect;

/// MySQL SQLSTATE for error 1060 (`ER_DUP_FIELDNAME`).
const DUPLICATE_COLUMN_SQLSTATE: &str = "42S21";

/// Optional columns, added in order after the base table exists.
/// Each entry is (column name, column definition for the dialect).
fn optional_columns(dialect: Dialect) -> [(&'static str, &'static str); 5] {
    let note = match dialect {
        // MySQL TEXT columns come back as blobs through the Any driver.
        Dialect::MySql => "VARCHAR(4000)",
        Dialect::Sqlite => "TEXT",
    };
    [
        ("interview_status", "VARCHAR(50) DEFAULT 'Pending'"),
        ("good_points", note),
        ("bad_points", note),
        ("overall", note),
        ("last_updated", "BIGINT"),
    ]
}

fn create_table_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => {
            r#"
            CREATE TABLE IF NOT EXISTS interview (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(255) NOT NULL,
                emailid VARCHAR(255) NOT NULL,
                interview_mode VARCHAR(50) NOT NULL
            )
            "#
        }
        Dialect::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS interview (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                emailid VARCHAR(255) NOT NULL,
                interview_mode VARCHAR(50) NOT NULL
            )
            "#
        }
    }
}

/// Ensures the base table and every optional column exist.
/// Safe to run on every start: columns that already exist are skipped,
/// any other failure aborts.
pub async fn ensure_schema(pool: &AnyPool, dialect: Dialect) -> Result<()> {
    sqlx::query(create_table_sql(dialect))
        .execute(pool)
        .await
        .context("Failed to create interview table")?;

    for (column, definition) in optional_columns(dialect) {
        let ddl = format!("ALTER TABLE interview ADD COLUMN {column} {definition}");
        match sqlx::query(&ddl).execute(pool).await {
            Ok(_) => info!("Added column interview.{column}"),
            Err(e) if is_duplicate_column(&e) => debug!("Column interview.{column} already present"),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to add column interview.{column}"))
            }
        }
    }

    Ok(())
}

/// True when the error says the column already exists.
///
/// MySQL reports a distinct SQLSTATE; SQLite only reports a generic error code,
/// so for it the message text is the only signal.
fn is_duplicate_column(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    if db_err.code().as_deref() == Some(DUPLICATE_COLUMN_SQLSTATE) {
        return true;
    }
    db_err.message().to_ascii_lowercase().contains("duplicate column")
}
