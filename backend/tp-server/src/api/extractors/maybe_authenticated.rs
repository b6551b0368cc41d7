use tp_auth::AuthContext;

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Caller identity when `optional_auth` could establish one
#[derive(Debug, Clone, Default)]
pub struct MaybeAuthenticated(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(parts.extensions.get::<AuthContext>().cloned()))
    }
}
