use crate::Claims;

use uuid::Uuid;

/// Validated identity attached to a request after token verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub claims: Claims,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email.clone(),
            is_active: claims.is_active,
            claims,
        }
    }
}
