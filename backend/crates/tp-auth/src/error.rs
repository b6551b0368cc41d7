use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token: {message} {location}")]
    InvalidToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Invalid claim '{claim}': {message} {location}")]
    InvalidClaim {
        claim: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Token signing failed: {source} {location}")]
    TokenGeneration {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("Missing authorization header {location}")]
    MissingHeader { location: ErrorLocation },

    #[error("Invalid authorization scheme: expected 'Bearer' {location}")]
    InvalidScheme { location: ErrorLocation },

    #[error("Password hashing failed: {source} {location}")]
    PasswordHash {
        #[source]
        source: bcrypt::BcryptError,
        location: ErrorLocation,
    },

    #[error("Password exceeds {max_bytes} bytes {location}")]
    PasswordTooLong {
        max_bytes: usize,
        location: ErrorLocation,
    },

    #[error("Password does not match {location}")]
    PasswordMismatch { location: ErrorLocation },

    #[error("Rate limit exceeded: {limit} requests per {window_secs}s {location}")]
    RateLimitExceeded {
        limit: u32,
        window_secs: u64,
        location: ErrorLocation,
    },

    #[error("Too many failed login attempts {location}")]
    AccountLocked { location: ErrorLocation },
}

impl AuthError {
    /// Machine-readable code surfaced to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::InvalidClaim { .. } => "INVALID_TOKEN",
            Self::TokenGeneration { .. } => "TOKEN_ERROR",
            Self::MissingHeader { .. } => "AUTH_REQUIRED",
            Self::InvalidScheme { .. } => "AUTH_REQUIRED",
            Self::PasswordHash { .. } => "INTERNAL_ERROR",
            Self::PasswordTooLong { .. } => "VALIDATION_ERROR",
            Self::PasswordMismatch { .. } => "INVALID_CREDENTIALS",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::AccountLocked { .. } => "ACCOUNT_LOCKED",
        }
    }

    /// True for failures caused by the presented token rather than by us
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken { .. } | Self::TokenExpired { .. } | Self::InvalidClaim { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
