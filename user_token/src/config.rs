//! Store configuration read from the environment

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::store::UserId;

const DEFAULT_DATABASE_URL: &str = "sqlite:users.db";
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SEED_COUNT: usize = 10_000;
const DEFAULT_LOAD_TEST_USER_ID: UserId = 12345;

/// Username that short-circuits verification with a fixed id
///
/// Meant for load tests that want to measure the HTTP path without touching
/// SQLite. Never enable it on a deployment that guards anything real.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestBypass {
    pub username: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// sqlx SQLite URL, e.g. `sqlite:users.db` or `sqlite::memory:`
    pub database_url: String,
    /// Upper bound for one credential lookup, including waiting for the pool and connection
    pub query_timeout: Duration,
    pub busy_timeout: Duration,
    /// Rows inserted by the administrative seed endpoint
    pub seed_count: usize,
    pub load_test_bypass: Option<LoadTestBypass>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            seed_count: DEFAULT_SEED_COUNT,
            load_test_bypass: None,
        }
    }
}

impl StoreConfig {
    /// Build the configuration from `USER_TOKEN_*` environment variables
    ///
    /// Missing variables take their defaults. Values that fail to parse are
    /// logged and replaced by the default as well.
    pub fn from_env() -> Self {
        let load_test_bypass = env::var("USER_TOKEN_LOAD_TEST_USER")
            .ok()
            .filter(|username| !username.is_empty())
            .map(|username| LoadTestBypass {
                username,
                user_id: env_or("USER_TOKEN_LOAD_TEST_USER_ID", DEFAULT_LOAD_TEST_USER_ID),
            });

        Self {
            database_url: env::var("USER_TOKEN_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            query_timeout: Duration::from_millis(env_or(
                "USER_TOKEN_QUERY_TIMEOUT_MS",
                DEFAULT_QUERY_TIMEOUT_MS,
            )),
            busy_timeout: Duration::from_millis(env_or(
                "USER_TOKEN_BUSY_TIMEOUT_MS",
                DEFAULT_BUSY_TIMEOUT_MS,
            )),
            seed_count: env_or("USER_TOKEN_SEED_COUNT", DEFAULT_SEED_COUNT),
            load_test_bypass,
        }
    }

    /// Private in-memory database, mainly for tests
    pub fn in_memory() -> Self {
        Self::default().with_database_url("sqlite::memory:")
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_load_test_bypass(mut self, username: impl Into<String>, user_id: UserId) -> Self {
        self.load_test_bypass = Some(LoadTestBypass {
            username: username.into(),
            user_id,
        });
        self
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable setting, using default");
            default
        }),
        Err(_) => default,
    }
}
