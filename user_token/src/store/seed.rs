use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, Executor, Statement};

use crate::hash::hash_password;
use crate::store::errors::StoreError;
use crate::store::schema;
use crate::store::store_type::UserStore;

const DELETE_ALL_USERS: &str = "DELETE FROM user";
const INSERT_USER: &str = "INSERT INTO user (mail, hashed_password) VALUES (?1, ?2)";

/// Synthetic credentials for seed row `i`: `user{i}@example.com` / `password{i}`
fn synthetic_user(i: usize) -> (String, String) {
    (
        format!("user{i}@example.com"),
        hash_password(&format!("password{i}")),
    )
}

impl UserStore {
    /// Replace every user with `count` synthetic users in one transaction
    ///
    /// Holds the maintenance gate exclusively, so lookups wait for the reload
    /// instead of observing a half-filled table, and concurrent seeds queue up.
    /// Rows that fail individually are skipped; the return value counts the
    /// rows actually inserted.
    #[tracing::instrument(skip(self))]
    pub async fn seed_users(&self, count: usize) -> Result<usize, StoreError> {
        let _maintenance = self.maintenance.write().await;
        let mut conn = self.conn.lock().await;

        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .persistent(false)
            .execute(&mut *conn)
            .await
        {
            tracing::debug!(error = %e, "WAL checkpoint before seeding failed");
        }

        let inserted = replace_users(&mut conn, (1..=count).map(synthetic_user)).await?;

        schema::optimize(&mut conn).await;
        tracing::info!(inserted, requested = count, "Seeded user table");

        Ok(inserted)
    }

    pub async fn count_users(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn.lock().await;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

/// Delete all users and insert `rows` inside a single transaction
///
/// A failing insert is logged and not counted; it does not abort the batch.
/// Dropping the transaction on an early return rolls the delete back too.
async fn replace_users(
    conn: &mut SqliteConnection,
    rows: impl Iterator<Item = (String, String)>,
) -> Result<usize, StoreError> {
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| StoreError::Transaction(e.to_string()))?;

    sqlx::query(DELETE_ALL_USERS).execute(&mut *tx).await?;

    let insert = (&mut *tx).prepare(INSERT_USER).await?;

    let mut inserted = 0;
    for (row, (mail, hashed_password)) in rows.enumerate() {
        match insert
            .query()
            .bind(mail)
            .bind(hashed_password)
            .execute(&mut *tx)
            .await
        {
            Ok(_) => inserted += 1,
            Err(e) => tracing::warn!(row = row + 1, error = %e, "Skipping seed row"),
        }
    }

    tx.commit()
        .await
        .map_err(|e| StoreError::Transaction(e.to_string()))?;

    Ok(inserted)
}
