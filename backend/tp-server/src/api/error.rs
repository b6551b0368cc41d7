//! REST API error types
//!
//! Every failure leaves the server as `{"error": {"code", "message", "details"?}}`
//! with a status taken from the variant.

use tp_auth::{AuthError, AuthServiceError};

use std::panic::Location;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body with code, message, and optional details
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "INVALID_TOKEN", "VALIDATION_ERROR")
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-correctable input (400)
    #[error("Validation failed [{code}]: {message} {location}")]
    Validation {
        code: &'static str,
        message: String,
        details: Option<Value>,
        location: ErrorLocation,
    },

    /// Missing, expired or rejected credentials (401)
    #[error("Unauthorized [{code}]: {message} {location}")]
    Unauthorized {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Authenticated but not allowed (403)
    #[error("Forbidden [{code}]: {message} {location}")]
    Forbidden {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Resource not found (404)
    #[error("Not found [{code}]: {message} {location}")]
    NotFound {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Duplicate resource (409)
    #[error("Conflict [{code}]: {message} {location}")]
    Conflict {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Rate limit or lockout (429)
    #[error("Too many requests [{code}]: {message} {location}")]
    TooManyRequests {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Opaque server failure (500)
    #[error("Internal error [{code}]: {message} {location}")]
    Internal {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::Validation {
            code: "VALIDATION_ERROR",
            message: message.into(),
            details: field.map(|f| json!({ "field": f })),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// 400 with a specific code and no details
    #[track_caller]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            code,
            message: message.into(),
            details: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            code,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Forbidden {
            code,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn too_many_requests(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::TooManyRequests {
            code,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Internal {
            code,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Rejection used by the auth middleware when no bearer token is usable
    #[track_caller]
    pub fn auth_required() -> Self {
        Self::unauthorized(
            "AUTH_REQUIRED",
            "Please provide a valid authentication token",
        )
    }

    /// Rejection for a token whose identity says the account is disabled
    #[track_caller]
    pub fn account_inactive() -> Self {
        Self::forbidden("ACCOUNT_INACTIVE", "Your account has been deactivated")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::Forbidden { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::TooManyRequests { code, .. }
            | ApiError::Internal { code, .. } => code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }

        let body = match self {
            ApiError::Validation {
                code,
                message,
                details,
                ..
            } => ApiErrorBody {
                code,
                message,
                details,
            },
            ApiError::Unauthorized { code, message, .. }
            | ApiError::Forbidden { code, message, .. }
            | ApiError::NotFound { code, message, .. }
            | ApiError::Conflict { code, message, .. }
            | ApiError::TooManyRequests { code, message, .. }
            | ApiError::Internal { code, message, .. } => ApiErrorBody {
                code,
                message,
                details: None,
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Token and limiter failures
impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        let code = e.error_code();
        match e {
            AuthError::TokenExpired { .. } => {
                Self::unauthorized(code, "Your session has expired. Please login again")
            }
            AuthError::InvalidToken { .. } | AuthError::InvalidClaim { .. } => {
                Self::unauthorized(code, "The provided token is invalid")
            }
            AuthError::MissingHeader { .. } | AuthError::InvalidScheme { .. } => {
                Self::auth_required()
            }
            AuthError::PasswordMismatch { .. } => {
                Self::unauthorized(code, "Email or password is incorrect")
            }
            AuthError::PasswordTooLong { max_bytes, .. } => Self::validation(
                format!("Password must be no more than {} bytes long", max_bytes),
                Some("password"),
            ),
            AuthError::RateLimitExceeded { .. } => Self::too_many_requests(
                code,
                "Too many requests. Please slow down your request rate.",
            ),
            AuthError::AccountLocked { .. } => Self::too_many_requests(
                code,
                "Too many failed login attempts. Please try again later.",
            ),
            AuthError::TokenGeneration { .. } => {
                log::error!("Token generation failed: {}", e);
                Self::internal(code, "Unable to generate authentication tokens")
            }
            AuthError::PasswordHash { .. } => {
                log::error!("Password hashing failed: {}", e);
                Self::internal(code, "An internal error occurred")
            }
        }
    }
}

/// Account use-case failures. Internal detail never reaches the body.
impl From<AuthServiceError> for ApiError {
    #[track_caller]
    fn from(e: AuthServiceError) -> Self {
        match e {
            AuthServiceError::Validation { field, message, .. } => {
                Self::validation(message, field.as_deref())
            }
            AuthServiceError::UserAlreadyExists { .. } => ApiError::Conflict {
                code: "USER_EXISTS",
                message: "An account with this email address already exists".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthServiceError::InvalidCredentials { .. } => {
                Self::unauthorized("INVALID_CREDENTIALS", "Email or password is incorrect")
            }
            AuthServiceError::UserInactive { .. } => Self::forbidden(
                "ACCOUNT_INACTIVE",
                "Your account has been deactivated. Please contact support",
            ),
            AuthServiceError::EmailNotVerified { .. } => Self::forbidden(
                "EMAIL_NOT_VERIFIED",
                "Please verify your email address before logging in",
            ),
            AuthServiceError::WeakPassword { reasons, .. } => ApiError::Validation {
                code: "WEAK_PASSWORD",
                message: "Password does not meet security requirements".to_string(),
                details: Some(json!({ "reasons": reasons })),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthServiceError::UserNotFound { .. } => ApiError::NotFound {
                code: "USER_NOT_FOUND",
                message: "User not found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthServiceError::Token { source, .. } => Self::from(source),
            AuthServiceError::Timeout { operation, .. } => {
                log::error!("Account operation '{}' timed out", operation);
                Self::internal("TIMEOUT", "The request timed out. Please try again later")
            }
            AuthServiceError::Internal { message, .. } => {
                log::error!("Account operation failed: {}", message);
                Self::internal("INTERNAL_ERROR", "An internal error occurred")
            }
        }
    }
}

/// Malformed or missing JSON bodies
impl From<JsonRejection> for ApiError {
    #[track_caller]
    fn from(e: JsonRejection) -> Self {
        log::debug!("Rejected request body: {}", e);
        ApiError::Validation {
            code: "INVALID_REQUEST",
            message: "Please provide valid JSON data".to_string(),
            details: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
