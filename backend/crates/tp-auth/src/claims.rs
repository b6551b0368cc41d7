use crate::{AuthError, Result as AuthErrorResult, TokenType};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signed token payload. Never persisted server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub token_type: TokenType,
    /// Issuer (application name)
    pub iss: String,
    /// Subject, the user id as a string
    pub sub: String,
    /// Audience tag
    pub aud: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Not-before timestamp (Unix seconds)
    pub nbf: i64,
    /// Issued at timestamp (Unix seconds)
    pub iat: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Validate claims after signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.sub != self.user_id.to_string() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub does not match user_id".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.email.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "email".to_string(),
                message: "email cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.jti.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "jti".to_string(),
                message: "jti cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    #[track_caller]
    pub fn expect_type(&self, expected: TokenType) -> AuthErrorResult<()> {
        if self.token_type != expected {
            return Err(AuthError::InvalidClaim {
                claim: "token_type".to_string(),
                message: format!("expected {} token, got {}", expected, self.token_type),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
