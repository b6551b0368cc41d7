use crate::{Clock, LimitClass, RateLimitConfig, RateLimiter};

use std::{sync::Arc, time::Duration as StdDuration};

use tokio::task::JoinHandle;

/// Policies for the four limiter classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterSetConfig {
    pub login: RateLimitConfig,
    pub register: RateLimitConfig,
    pub auth: RateLimitConfig,
    pub general: RateLimitConfig,
}

impl Default for RateLimiterSetConfig {
    fn default() -> Self {
        Self {
            login: RateLimitConfig::login(),
            register: RateLimitConfig::register(),
            auth: RateLimitConfig::auth(),
            general: RateLimitConfig::general(),
        }
    }
}

/// One independent limiter per [`LimitClass`], built once at startup
#[derive(Clone)]
pub struct RateLimiterSet {
    login: Arc<RateLimiter>,
    register: Arc<RateLimiter>,
    auth: Arc<RateLimiter>,
    general: Arc<RateLimiter>,
}

impl RateLimiterSet {
    pub fn new(config: RateLimiterSetConfig, clock: Arc<dyn Clock>) -> Self {
        let build = |class: LimitClass, policy: RateLimitConfig| {
            Arc::new(RateLimiter::new(class.as_str(), policy, Arc::clone(&clock)))
        };

        Self {
            login: build(LimitClass::Login, config.login),
            register: build(LimitClass::Register, config.register),
            auth: build(LimitClass::Auth, config.auth),
            general: build(LimitClass::General, config.general),
        }
    }

    pub fn limiter(&self, class: LimitClass) -> &Arc<RateLimiter> {
        match class {
            LimitClass::Login => &self.login,
            LimitClass::Register => &self.register,
            LimitClass::Auth => &self.auth,
            LimitClass::General => &self.general,
        }
    }

    /// Resolve the class for a request and consume one slot from its limiter
    pub fn allow(&self, method: &str, path: &str, key: &str) -> Result<LimitClass, LimitClass> {
        let class = LimitClass::select(method, path);
        if self.limiter(class).allow(key) {
            Ok(class)
        } else {
            Err(class)
        }
    }

    pub fn spawn_sweepers(&self, interval: StdDuration) -> Vec<JoinHandle<()>> {
        [&self.login, &self.register, &self.auth, &self.general]
            .into_iter()
            .map(|limiter| limiter.spawn_sweeper(interval))
            .collect()
    }
}
