use error_location::ErrorLocation;
use thiserror::Error;

/// Failures reported by a `UserStore` implementation.
///
/// The text carried here is for logs only and must not be echoed to clients.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate user email: {email} {location}")]
    Duplicate {
        email: String,
        location: ErrorLocation,
    },

    #[error("User store unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Corrupt user record: {message} {location}")]
    Corrupt {
        message: String,
        location: ErrorLocation,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
