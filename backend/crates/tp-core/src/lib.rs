pub mod error;
pub mod models;
pub mod user_store;

pub use error::{StoreError, StoreResult};
pub use models::user::User;
pub use user_store::UserStore;
