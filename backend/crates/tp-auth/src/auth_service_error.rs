use crate::AuthError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Account use-case failures. Store and infrastructure details stay in the
/// logs; only the variant reaches callers.
#[derive(Error, Debug)]
pub enum AuthServiceError {
    #[error("Validation failed: {message} {location}")]
    Validation {
        field: Option<String>,
        message: String,
        location: ErrorLocation,
    },

    #[error("User already exists {location}")]
    UserAlreadyExists { location: ErrorLocation },

    #[error("Invalid credentials {location}")]
    InvalidCredentials { location: ErrorLocation },

    #[error("User account is inactive {location}")]
    UserInactive { location: ErrorLocation },

    #[error("Email not verified {location}")]
    EmailNotVerified { location: ErrorLocation },

    #[error("Password does not meet strength requirements: {reasons:?} {location}")]
    WeakPassword {
        reasons: Vec<String>,
        location: ErrorLocation,
    },

    #[error("User not found {location}")]
    UserNotFound { location: ErrorLocation },

    #[error("Token error: {source} {location}")]
    Token {
        #[source]
        source: AuthError,
        location: ErrorLocation,
    },

    #[error("Operation '{operation}' timed out {location}")]
    Timeout {
        operation: &'static str,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthServiceError {
    #[track_caller]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn user_not_found() -> Self {
        Self::UserNotFound {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<AuthError> for AuthServiceError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        Self::Token {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthServiceError>;
