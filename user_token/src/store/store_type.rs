use std::sync::Arc;

use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;
use tokio::sync::{Mutex, RwLock};

use crate::config::StoreConfig;
use crate::pool::{PoolStats, StatementPool};
use crate::store::errors::StoreError;
use crate::store::lookup::CredentialLookup;
use crate::store::schema;

/// Primary key of a row in the user table
pub type UserId = i64;

/// The one connection every component of the store shares
pub(crate) type SharedConnection = Arc<Mutex<SqliteConnection>>;

/// SQLite-backed user store
///
/// Owns the single database connection, the pool of prepared lookup
/// statements bound to it, and the maintenance gate that keeps lookups out of
/// a running bulk reload. Create one per process with [`UserStore::open`],
/// share it behind an `Arc`, and tear it down with [`UserStore::close`].
pub struct UserStore {
    pub(crate) conn: SharedConnection,
    pub(crate) statements: StatementPool<CredentialLookup>,
    pub(crate) maintenance: RwLock<()>,
    pub(crate) config: StoreConfig,
}

impl UserStore {
    /// Open or create the database, tune it and make sure the schema exists
    ///
    /// Errors are fatal for the service: the file could not be opened, the
    /// schema could not be created, or the lookup statement does not compile.
    /// Tuning pragmas are best effort.
    #[tracing::instrument(skip(config), fields(database_url = %config.database_url))]
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let mut conn = schema::connect(&config).await?;

        schema::apply_tuning_pragmas(&mut conn).await;
        schema::create_tables(&mut conn).await?;
        schema::validate_user_table(&mut conn).await?;
        schema::optimize(&mut conn).await;

        let conn = Arc::new(Mutex::new(conn));
        let statements = StatementPool::new(CredentialLookup::new(conn.clone()));

        // Compile one lookup up front so a broken query stops startup
        drop(statements.acquire().await?);

        if let Some(bypass) = &config.load_test_bypass {
            tracing::warn!(
                username = %bypass.username,
                user_id = bypass.user_id,
                "Load test bypass enabled: this username authenticates without a password"
            );
        }

        tracing::info!("User store opened");

        Ok(Self {
            conn,
            statements,
            maintenance: RwLock::new(()),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.statements.stats()
    }

    /// Finalize every pooled statement and close the connection
    ///
    /// Returns the number of pooled statements finalized.
    pub async fn close(self) -> usize {
        let UserStore {
            conn, statements, ..
        } = self;

        let finalized = statements.close();
        // The preparer holds the other reference to the connection
        drop(statements);

        match Arc::try_unwrap(conn) {
            Ok(conn) => {
                if let Err(e) = conn.into_inner().close().await {
                    tracing::warn!(error = %e, "Failed to close database connection cleanly");
                }
            }
            Err(_) => {
                tracing::warn!("Database connection still shared at shutdown, leaving it to drop");
            }
        }

        tracing::info!(finalized, "User store closed");
        finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_password;
    use crate::pool::PoolError;
    use crate::test_utils::memory_store;

    #[tokio::test]
    async fn test_open_warms_one_statement() {
        let store = memory_store().await;

        assert_eq!(
            store.pool_stats(),
            PoolStats {
                created: 1,
                available: 1
            }
        );
        assert_eq!(store.count_users().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_open_rejects_unreachable_path() {
        let config = StoreConfig::default().with_database_url("sqlite:/nonexistent-dir/users.db");

        match UserStore::open(config).await {
            Err(e) => assert!(e.is_fatal(), "open failure must be fatal: {e}"),
            Ok(_) => panic!("open should fail for an unreachable path"),
        }
    }

    #[tokio::test]
    async fn test_lookup_after_pool_close_fails() {
        let store = memory_store().await;
        store.statements.close();

        let result = store
            .verify_user("user1@example.com", &hash_password("password1"))
            .await;

        assert!(matches!(result, Err(StoreError::Pool(PoolError::Closed))));
    }

    #[tokio::test]
    async fn test_close_finalizes_every_pooled_statement() {
        let store = memory_store().await;
        store.seed_users(2).await.expect("seed");

        {
            let first = store.statements.acquire().await.expect("first acquire");
            let second = store.statements.acquire().await.expect("second acquire");
            assert_eq!(store.pool_stats().borrowed(), 2);
            drop((first, second));
        }
        assert_eq!(
            store.pool_stats(),
            PoolStats {
                created: 2,
                available: 2
            }
        );

        assert_eq!(store.close().await, 2);
    }
}
