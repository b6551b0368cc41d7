use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_AUDIENCE,
    DEFAULT_BCRYPT_COST, DEFAULT_ISSUER, DEFAULT_REFRESH_TOKEN_TTL, DEFAULT_STORE_TIMEOUT_SECS,
    MAX_BCRYPT_COST, MIN_BCRYPT_COST, MIN_JWT_SECRET_LENGTH,
};

use std::time::Duration;

use serde::Deserialize;

/// Token signing and password hashing settings.
///
/// TTLs are humantime strings ("15m", "24h", "7days").
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret; required
    pub jwt_secret: Option<String>,
    pub access_token_ttl: String,
    pub refresh_token_ttl: String,
    pub issuer: String,
    pub audience: String,
    pub bcrypt_cost: u32,
    pub store_timeout_secs: u64,
    /// Adds `Secure` to the refresh cookie
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_ttl: String::from(DEFAULT_ACCESS_TOKEN_TTL),
            refresh_token_ttl: String::from(DEFAULT_REFRESH_TOKEN_TTL),
            issuer: String::from(DEFAULT_ISSUER),
            audience: String::from(DEFAULT_AUDIENCE),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
            cookie_secure: true,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.secret()?;

        if self.bcrypt_cost < MIN_BCRYPT_COST || self.bcrypt_cost > MAX_BCRYPT_COST {
            return Err(ConfigError::auth(format!(
                "auth.bcrypt_cost must be {}-{}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }

        let access = self.access_ttl()?;
        let refresh = self.refresh_ttl()?;

        if access.is_zero() {
            return Err(ConfigError::auth("auth.access_token_ttl must be positive"));
        }

        if refresh <= access {
            return Err(ConfigError::auth(format!(
                "auth.refresh_token_ttl ({}) must be longer than auth.access_token_ttl ({})",
                self.refresh_token_ttl, self.access_token_ttl
            )));
        }

        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err(ConfigError::auth(
                "auth.issuer and auth.audience cannot be empty",
            ));
        }

        if self.store_timeout_secs == 0 {
            return Err(ConfigError::auth("auth.store_timeout_secs must be at least 1"));
        }

        Ok(())
    }

    /// The signing secret, checked for presence and length
    pub fn secret(&self) -> ConfigErrorResult<&str> {
        let secret = self
            .jwt_secret
            .as_deref()
            .ok_or_else(|| ConfigError::auth("auth.jwt_secret is required"))?;

        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::auth(format!(
                "auth.jwt_secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(secret)
    }

    pub fn access_ttl(&self) -> ConfigErrorResult<Duration> {
        parse_ttl("auth.access_token_ttl", &self.access_token_ttl)
    }

    pub fn refresh_ttl(&self) -> ConfigErrorResult<Duration> {
        parse_ttl("auth.refresh_token_ttl", &self.refresh_token_ttl)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

fn parse_ttl(field: &str, value: &str) -> ConfigErrorResult<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| ConfigError::auth(format!("{} '{}' is not a duration: {}", field, value, e)))
}
