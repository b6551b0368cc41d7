pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{DatabaseOptions, connect, run_migrations};
pub use error::{DbError, Result};
pub use repositories::user_repository::UserRepository;
