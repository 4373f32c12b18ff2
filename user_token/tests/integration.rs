/// Integration tests for the user-token store
///
/// These tests run the store against real database files in a temporary
/// directory, the way the HTTP server uses it.
mod common;

mod integration {
    pub mod seed_flows;
    pub mod verify_flows;
}
