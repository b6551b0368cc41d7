pub mod auth_context;
pub mod auth_service;
pub mod auth_service_error;
pub mod bearer;
pub mod brute_force_guard;
pub mod claims;
pub mod client_key;
pub mod clock;
pub mod email;
pub mod error;
pub mod failure_record;
pub mod issued_token;
pub mod limit_class;
pub mod password_policy;
pub mod password_strength;
pub mod rate_limit_config;
pub mod rate_limiter;
pub mod rate_limiter_set;
pub mod rate_window;
pub mod requests;
pub mod token_service;
pub mod token_type;

pub use auth_context::AuthContext;
pub use auth_service::AuthService;
pub use auth_service_error::{AuthServiceError, Result as AuthServiceResult};
pub use bearer::extract_bearer_token;
pub use brute_force_guard::BruteForceGuard;
pub use claims::Claims;
pub use client_key::ClientKey;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, Result};
pub use failure_record::FailureRecord;
pub use issued_token::{IssuedToken, TokenPair};
pub use limit_class::LimitClass;
pub use password_policy::PasswordPolicy;
pub use password_strength::PasswordStrength;
pub use rate_limit_config::RateLimitConfig;
pub use rate_limiter::RateLimiter;
pub use rate_limiter_set::{RateLimiterSet, RateLimiterSetConfig};
pub use rate_window::RateWindow;
pub use requests::{LoginCredentials, PasswordChange, ProfileUpdate, Registration};
pub use token_service::{TokenService, TokenServiceConfig};
pub use token_type::TokenType;

#[cfg(test)]
mod tests;
