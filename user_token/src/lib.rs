//! user_token - Credential verification core for the user token API
//!
//! This crate owns the SQLite-backed user store: a pool of reusable prepared
//! lookup statements, the credential verifier built on top of it, and the
//! transactional bulk loader that seeds synthetic users.

mod config;
mod coordination;
mod hash;
mod pool;
mod store;

#[cfg(test)]
mod test_utils;

pub use config::{LoadTestBypass, StoreConfig};

pub use coordination::{
    AUTH_ERROR_MESSAGE, INVALID_CREDENTIALS_MESSAGE, LoginRequest, LoginResponse,
    create_test_users_core, get_user_token_core,
};

pub use hash::hash_password;

pub use pool::{PoolError, PoolStats, PooledHandle, Prepare, StatementPool};

pub use store::{StoreError, UserId, UserStore};
