use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Bucket identity for rate limiting and lockouts. Recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn for_user(user_id: Uuid) -> Self {
        Self(format!("user:{}", user_id))
    }

    /// `ip:<ip>:<first 8 hex chars of sha256(user agent)>`
    pub fn for_client(ip: &str, user_agent: &str) -> Self {
        let digest = hex::encode(Sha256::digest(user_agent.as_bytes()));
        Self(format!("ip:{}:{}", ip, &digest[..8]))
    }

    pub fn resolve(user_id: Option<Uuid>, ip: &str, user_agent: &str) -> Self {
        match user_id {
            Some(id) => Self::for_user(id),
            None => Self::for_client(ip, user_agent),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
