use tp_core::StoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Email already registered: {email} {location}")]
    DuplicateEmail {
        email: String,
        location: ErrorLocation,
    },

    #[error("Invalid row data: {message} {location}")]
    InvalidRow {
        message: String,
        location: ErrorLocation,
    },
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    #[track_caller]
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::Migration {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for StoreError {
    #[track_caller]
    fn from(error: DbError) -> Self {
        match error {
            DbError::DuplicateEmail { email, location } => StoreError::Duplicate { email, location },
            DbError::InvalidRow { message, location } => StoreError::Corrupt { message, location },
            other => StoreError::Unavailable {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
