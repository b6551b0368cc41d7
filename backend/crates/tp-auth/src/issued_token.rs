use crate::Claims;

use chrono::{DateTime, Utc};

/// A freshly signed token together with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub claims: Claims,
}

/// Access and refresh tokens minted together for one login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

impl TokenPair {
    /// Seconds between the access and refresh expiries
    pub fn refresh_window_secs(&self) -> i64 {
        (self.refresh.expires_at - self.access.expires_at)
            .num_seconds()
            .max(0)
    }
}
