mod errors;
mod lookup;
mod schema;
mod seed;
mod store_type;

pub use errors::StoreError;
pub use store_type::{UserId, UserStore};
