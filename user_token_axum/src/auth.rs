use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};

use user_token::{LoginRequest, LoginResponse, UserStore, create_test_users_core, get_user_token_core};

use crate::IntoResponseError;

/// Create a router for the credential check and seeding endpoints
pub(super) fn router() -> Router<Arc<UserStore>> {
    Router::new()
        .route("/get-user-token", post(get_user_token))
        .route("/create-db", get(create_db))
}

/// Check a username and pre-hashed password
///
/// Always answers with a JSON body. A body that is not valid JSON or lacks a
/// field gets the same failure as unknown credentials, so clients cannot tell
/// the two apart.
pub(crate) async fn get_user_token(
    State(store): State<Arc<UserStore>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Json<LoginResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected malformed login request");
            return Json(LoginResponse::invalid_credentials());
        }
    };

    Json(get_user_token_core(&store, &request).await)
}

/// Replace the user table with the configured number of synthetic users
pub(crate) async fn create_db(
    State(store): State<Arc<UserStore>>,
) -> Result<String, (StatusCode, String)> {
    let count = create_test_users_core(&store).await.into_response_error()?;

    Ok(format!("Successfully created {count} users in the database"))
}
