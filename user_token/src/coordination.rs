//! Request-level operations the HTTP layer calls into
//!
//! These functions turn store results into the wire types of the token API so
//! that every HTTP integration renders identical bodies.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::store::{StoreError, UserId, UserStore};

/// Returned for a malformed request and for credentials that match no user alike
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Returned when the store itself failed
pub const AUTH_ERROR_MESSAGE: &str = "An error occurred during authentication";

/// Body of a credential check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "UserName")]
    pub user_name: String,
    /// SHA-256 hex digest computed by the client
    #[serde(rename = "HashedPassword")]
    pub hashed_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "UserId")]
    pub user_id: Option<UserId>,
    #[serde(rename = "ErrorMessage", skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<Cow<'static, str>>,
}

impl LoginResponse {
    pub fn success(user_id: UserId) -> Self {
        Self {
            success: true,
            user_id: Some(user_id),
            error_message: None,
        }
    }

    pub fn failure(message: &'static str) -> Self {
        Self {
            success: false,
            user_id: None,
            error_message: Some(Cow::Borrowed(message)),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::failure(INVALID_CREDENTIALS_MESSAGE)
    }
}

/// Verify a login request and build the response body
///
/// Never fails: storage errors are logged and rendered as a generic failure.
pub async fn get_user_token_core(store: &UserStore, request: &LoginRequest) -> LoginResponse {
    match store
        .verify_user(&request.user_name, &request.hashed_password)
        .await
    {
        Ok(Some(user_id)) => LoginResponse::success(user_id),
        Ok(None) => LoginResponse::invalid_credentials(),
        Err(e) => {
            tracing::error!(error = %e, "Authentication failed on a store error");
            LoginResponse::failure(AUTH_ERROR_MESSAGE)
        }
    }
}

/// Reload the user table with the configured number of synthetic users
pub async fn create_test_users_core(store: &UserStore) -> Result<usize, StoreError> {
    let count = store.config().seed_count;
    let inserted = store.seed_users(count).await?;
    tracing::info!("Created {} test users", inserted);
    Ok(inserted)
}
