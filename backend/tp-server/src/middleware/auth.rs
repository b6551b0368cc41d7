//! Bearer-token gate for protected routes.

use crate::{ApiError, AppState};

use tp_auth::{AuthContext, AuthError, Claims, extract_bearer_token};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use log::{debug, warn};

/// Reject unless the request carries a valid access token for an active
/// account; on success the [`AuthContext`] is attached to the request.
///
/// The active flag is read from the token, not the store, so a deactivation
/// takes effect for this check once the caller's access token is reissued.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();

    let token = bearer(request.headers()).map_err(|e| {
        warn!("Authentication failed - no token provided for {}: {}", path, e);
        ApiError::auth_required()
    })?;

    let claims = state
        .tokens
        .validate_access_token(token)
        .map_err(|e| {
            warn!("Authentication failed - invalid token for {}: {}", path, e);
            token_rejection(e)
        })?;

    if !claims.is_active {
        warn!(
            "Authentication failed - inactive user {} ({}) for {}",
            claims.user_id, claims.email, path
        );
        return Err(ApiError::account_inactive());
    }

    debug!("Authentication successful for {} on {}", claims.user_id, path);
    attach(&mut request, claims);

    Ok(next.run(request).await)
}

/// Same checks as [`require_auth`] but never rejects: a missing, invalid or
/// inactive token leaves the request anonymous.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = bearer(request.headers())
        .ok()
        .map(|token| state.tokens.validate_access_token(token));

    match claims {
        Some(Ok(claims)) if claims.is_active => {
            debug!("Optional authentication successful for {}", claims.user_id);
            attach(&mut request, claims);
        }
        Some(Ok(claims)) => {
            debug!("Optional authentication - inactive user {}", claims.user_id);
        }
        Some(Err(e)) => debug!("Optional authentication failed: {}", e),
        None => {}
    }

    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> tp_auth::Result<&str> {
    extract_bearer_token(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()))
}

fn attach(request: &mut Request, claims: Claims) {
    request
        .extensions_mut()
        .insert(AuthContext::from_claims(claims));
}

/// Expired and malformed tokens get their own codes; anything else is a
/// generic failure
fn token_rejection(e: AuthError) -> ApiError {
    match e {
        AuthError::TokenExpired { .. }
        | AuthError::InvalidToken { .. }
        | AuthError::InvalidClaim { .. } => ApiError::from(e),
        _ => ApiError::unauthorized(
            "AUTH_FAILED",
            "Unable to verify authentication token",
        ),
    }
}
