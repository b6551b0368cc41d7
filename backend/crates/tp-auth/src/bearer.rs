use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of an `Authorization` header value.
///
/// A missing header or an empty token is `MissingHeader`; any other scheme is
/// `InvalidScheme`. The prefix match is case-sensitive.
#[track_caller]
pub fn extract_bearer_token(header: Option<&str>) -> AuthErrorResult<&str> {
    let header = header.ok_or_else(|| AuthError::MissingHeader {
        location: ErrorLocation::from(Location::caller()),
    })?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AuthError::InvalidScheme {
            location: ErrorLocation::from(Location::caller()),
        })?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingHeader {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(token)
}
