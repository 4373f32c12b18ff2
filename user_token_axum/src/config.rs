use std::sync::LazyLock;

/// Route prefix for the credential and seeding endpoints
///
/// Default: "/api/auth"
pub static USER_TOKEN_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("USER_TOKEN_ROUTE_PREFIX").unwrap_or_else(|_| "/api/auth".to_string())
});
