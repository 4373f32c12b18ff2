use std::time::Duration;

use thiserror::Error;

use crate::pool::PoolError;

#[derive(Clone, Error, Debug)]
pub enum StoreError {
    /// The database file could not be opened or created
    #[error("Failed to open store: {0}")]
    Open(String),

    /// The user table or its index could not be created, or has the wrong shape
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Statement pool error: {0}")]
    Pool(PoolError),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Whether the process should refuse to start on this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::Open(_) | StoreError::Schema(_) | StoreError::Pool(PoolError::Prepare(_))
        )
    }
}

impl From<PoolError> for StoreError {
    fn from(err: PoolError) -> Self {
        StoreError::Pool(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let error = StoreError::Schema("table user has no column mail".to_string());
        assert_eq!(
            error.to_string(),
            "Schema error: table user has no column mail"
        );

        let error = StoreError::Timeout(Duration::from_millis(250));
        assert_eq!(error.to_string(), "Operation timed out after 250ms");
    }

    #[test]
    fn test_from_pool_error() {
        let error = StoreError::from(PoolError::Closed);
        match error {
            StoreError::Pool(PoolError::Closed) => {}
            other => panic!("Expected Pool(Closed), got {other:?}"),
        }
    }

    #[test]
    fn test_from_sqlx_error() {
        let error = StoreError::from(sqlx::Error::RowNotFound);
        match error {
            StoreError::Query(msg) => assert!(msg.contains("no rows returned")),
            other => panic!("Expected Query variant, got {other:?}"),
        }
    }

    #[test]
    fn test_fatal_classification() {
        assert!(StoreError::Open("permission denied".to_string()).is_fatal());
        assert!(StoreError::Schema("bad".to_string()).is_fatal());
        assert!(StoreError::Pool(PoolError::Prepare("bad sql".to_string())).is_fatal());

        assert!(!StoreError::Pool(PoolError::Closed).is_fatal());
        assert!(!StoreError::Query("disk I/O error".to_string()).is_fatal());
        assert!(!StoreError::Timeout(Duration::from_secs(1)).is_fatal());
    }

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<StoreError>();
    }
}
