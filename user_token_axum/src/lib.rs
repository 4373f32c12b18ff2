mod auth;
mod config;
mod error;
mod router;

pub use config::USER_TOKEN_ROUTE_PREFIX;
pub use error::IntoResponseError;
pub use router::{user_token_router, user_token_router_no_trace};

// Re-export the store types an application needs to build the router state
pub use user_token::{StoreConfig, StoreError, UserStore};
