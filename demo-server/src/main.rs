use std::sync::Arc;

use user_token_axum::{StoreConfig, USER_TOKEN_ROUTE_PREFIX, UserStore, user_token_router};

mod server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::init_tracing("demo_server");

    let store = Arc::new(UserStore::open(StoreConfig::from_env()).await?);
    let app = user_token_router(store.clone());

    let addr = server::listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("User token API listening on http://{}", addr);
    tracing::info!("Available endpoints:");
    tracing::info!("  POST {}/get-user-token - Authenticate user", *USER_TOKEN_ROUTE_PREFIX);
    tracing::info!("  GET {}/create-db - Create test database", *USER_TOKEN_ROUTE_PREFIX);
    tracing::info!("  GET /health - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    match Arc::try_unwrap(store) {
        Ok(store) => {
            store.close().await;
        }
        Err(_) => tracing::warn!("Store still referenced after shutdown, skipping explicit close"),
    }

    Ok(())
}
