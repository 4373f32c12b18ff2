//! Combined router for the user token API

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use user_token::UserStore;

use crate::config::USER_TOKEN_ROUTE_PREFIX;

/// Create the router for all token API endpoints
///
/// The endpoints will be available at:
/// - GET  /health
/// - POST {USER_TOKEN_ROUTE_PREFIX}/get-user-token
/// - GET  {USER_TOKEN_ROUTE_PREFIX}/create-db
pub fn user_token_router(store: Arc<UserStore>) -> Router {
    user_token_router_no_trace(store).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::DEBUG))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Micros),
            ),
    )
}

/// Same as `user_token_router()` but without the HTTP tracing middleware
///
/// Use this if you want to add your own tracing middleware, or for load tests
/// where per-request spans would dominate the measurement.
pub fn user_token_router_no_trace(store: Arc<UserStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(mount_auth_routes(USER_TOKEN_ROUTE_PREFIX.as_str()))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Place the auth routes under `prefix`
///
/// An empty or "/" prefix mounts them at the root, since axum cannot nest there.
fn mount_auth_routes(prefix: &str) -> Router<Arc<UserStore>> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        super::auth::router()
    } else {
        Router::new().nest(&format!("/{prefix}"), super::auth::router())
    }
}

async fn health() -> &'static str {
    "UserTokenApi Rust server is running"
}
