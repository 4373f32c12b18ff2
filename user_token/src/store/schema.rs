use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};

use crate::config::StoreConfig;
use crate::store::errors::StoreError;

pub(super) const USER_TABLE: &str = "user";

// Durability is traded for write latency here: WAL with synchronous=NORMAL can
// lose the last transactions on power loss, never corrupt the file.
const TUNING_PRAGMAS: &[(&str, &str)] = &[
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    ("cache_size", "-64000"),
    ("temp_store", "MEMORY"),
    ("mmap_size", "268435456"),
];

pub(super) async fn connect(config: &StoreConfig) -> Result<SqliteConnection, StoreError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| StoreError::Open(e.to_string()))?
        .create_if_missing(true)
        .busy_timeout(config.busy_timeout);

    SqliteConnection::connect_with(&options)
        .await
        .map_err(|e| StoreError::Open(e.to_string()))
}

/// Apply performance pragmas; a failing pragma is logged and skipped
pub(super) async fn apply_tuning_pragmas(conn: &mut SqliteConnection) {
    for (name, value) in TUNING_PRAGMAS {
        let sql = format!("PRAGMA {name} = {value}");
        match sqlx::query(&sql).persistent(false).execute(&mut *conn).await {
            Ok(_) => tracing::debug!(pragma = name, value, "Applied pragma"),
            Err(e) => tracing::warn!(pragma = name, value, error = %e, "Failed to apply pragma"),
        }
    }
}

pub(super) async fn create_tables(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {USER_TABLE} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mail TEXT NOT NULL UNIQUE,
            hashed_password TEXT NOT NULL
        )
        "#
    ))
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::Schema(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        CREATE INDEX IF NOT EXISTS idx_user_mail_password ON {USER_TABLE} (mail, hashed_password)
        "#
    ))
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::Schema(e.to_string()))?;

    Ok(())
}

/// Validates that the user table schema matches what we expect
///
/// `CREATE TABLE IF NOT EXISTS` happily keeps a foreign table of the same name,
/// so an existing file is checked column by column.
pub(super) async fn validate_user_table(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let expected_columns = [
        ("id", "INTEGER"),
        ("mail", "TEXT"),
        ("hashed_password", "TEXT"),
    ];

    let rows = sqlx::query(&format!("PRAGMA table_info({USER_TABLE})"))
        .persistent(false)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| StoreError::Schema(e.to_string()))?;

    let actual_columns: Vec<(String, String)> = rows
        .iter()
        .map(|row| {
            let name: String = row.get("name");
            let type_: String = row.get("type");
            (name, type_)
        })
        .collect();

    for (expected_name, expected_type) in expected_columns {
        match actual_columns
            .iter()
            .find(|(name, _)| name.as_str() == expected_name)
        {
            Some((_, actual_type)) if actual_type.eq_ignore_ascii_case(expected_type) => {}
            Some((_, actual_type)) => {
                return Err(StoreError::Schema(format!(
                    "Column '{expected_name}' has type '{actual_type}' but expected '{expected_type}'"
                )));
            }
            None => {
                return Err(StoreError::Schema(format!(
                    "Table '{USER_TABLE}' is missing column '{expected_name}'"
                )));
            }
        }
    }

    tracing::debug!(table = USER_TABLE, "Schema validation passed");
    Ok(())
}

/// Refresh planner statistics; best effort
pub(super) async fn optimize(conn: &mut SqliteConnection) {
    for sql in ["ANALYZE", "PRAGMA optimize"] {
        if let Err(e) = sqlx::query(sql).persistent(false).execute(&mut *conn).await {
            tracing::debug!(statement = sql, error = %e, "Optimization step failed");
        }
    }
}
