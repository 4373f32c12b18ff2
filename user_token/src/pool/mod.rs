//! Pool of reusable prepared statements
//!
//! The pool knows nothing about SQLite: it hands out whatever handle a
//! [`Prepare`] implementation produces and takes it back when the borrowing
//! [`PooledHandle`] goes out of scope.

mod errors;
mod statement_pool;

pub use errors::PoolError;
pub use statement_pool::{PoolStats, PooledHandle, Prepare, StatementPool};
