use crate::{ConfigError, ConfigErrorResult, DEFAULT_SWEEP_INTERVAL_SECS};

use serde::Deserialize;

// Rate limit constraints
pub const MIN_RATE_LIMIT_REQUESTS: u32 = 1;
pub const MAX_RATE_LIMIT_REQUESTS: u32 = 100_000;

pub const MIN_RATE_LIMIT_WINDOW_SECS: u64 = 1;
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 86_400;

/// One fixed-window policy: `max_requests` per `window_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitPolicy {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    fn validate(&self, name: &str) -> ConfigErrorResult<()> {
        if self.max_requests < MIN_RATE_LIMIT_REQUESTS
            || self.max_requests > MAX_RATE_LIMIT_REQUESTS
        {
            return Err(ConfigError::rate_limit(format!(
                "rate_limit.{}.max_requests must be {}-{}, got {}",
                name, MIN_RATE_LIMIT_REQUESTS, MAX_RATE_LIMIT_REQUESTS, self.max_requests
            )));
        }

        if self.window_secs < MIN_RATE_LIMIT_WINDOW_SECS
            || self.window_secs > MAX_RATE_LIMIT_WINDOW_SECS
        {
            return Err(ConfigError::rate_limit(format!(
                "rate_limit.{}.window_secs must be {}-{}, got {}",
                name, MIN_RATE_LIMIT_WINDOW_SECS, MAX_RATE_LIMIT_WINDOW_SECS, self.window_secs
            )));
        }

        Ok(())
    }
}

/// Per-class request limits, keyed by client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub login: RateLimitPolicy,
    pub register: RateLimitPolicy,
    pub auth: RateLimitPolicy,
    pub general: RateLimitPolicy,
    /// How often idle client windows are dropped
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: RateLimitPolicy::new(5, 900),
            register: RateLimitPolicy::new(3, 3600),
            auth: RateLimitPolicy::new(20, 900),
            general: RateLimitPolicy::new(1000, 3600),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.login.validate("login")?;
        self.register.validate("register")?;
        self.auth.validate("auth")?;
        self.general.validate("general")?;

        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::rate_limit(
                "rate_limit.sweep_interval_secs must be at least 1",
            ));
        }

        Ok(())
    }
}
