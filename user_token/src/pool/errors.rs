use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoolError {
    /// The statement could not be compiled against the connection.
    /// Treated as a configuration error: the query text or schema is wrong.
    #[error("Failed to prepare statement: {0}")]
    Prepare(String),

    #[error("Statement pool is closed")]
    Closed,
}
