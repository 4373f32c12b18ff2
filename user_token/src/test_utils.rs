//! Test utilities module for shared test initialization and helpers
//!
//! Every store built here is backed by its own `sqlite::memory:` database.
//! The store holds exactly one connection, so tests never see each other's rows
//! and can run in parallel.

use std::sync::Once;

use crate::config::StoreConfig;
use crate::store::UserStore;

/// Load `.env_test` (falling back to `.env`) once per test binary
pub fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

/// Open a fresh in-memory store with default settings
pub async fn memory_store() -> UserStore {
    memory_store_with(StoreConfig::in_memory()).await
}

/// Open a fresh store with the given configuration
pub async fn memory_store_with(config: StoreConfig) -> UserStore {
    init_test_environment();
    UserStore::open(config)
        .await
        .expect("Failed to open test store")
}
