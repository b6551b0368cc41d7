//! Identity attached by `require_auth`

use crate::ApiError;

use tp_auth::AuthContext;

use axum::{extract::FromRequestParts, http::request::Parts};

/// The verified caller. Only usable behind the `require_auth` layer; a route
/// without it rejects every request as unauthenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                log::warn!("Protected handler reached without an auth context");
                ApiError::auth_required()
            })
    }
}
