use crate::{AuthError, Clock, RateLimitConfig, RateWindow, Result as AuthErrorResult};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration as StdDuration,
};

use chrono::Duration;
use error_location::ErrorLocation;
use log::debug;
use tokio::task::JoinHandle;

pub const DEFAULT_SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(5 * 60);

/// Fixed-window request counter keyed by client key.
///
/// One mutex guards the whole map. `allow` is the only mutator of live
/// windows; `sweep` only evicts idle ones.
pub struct RateLimiter {
    name: String,
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, RateWindow>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(name: impl Into<String>, config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            config,
            windows: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    pub fn allow(&self, key: &str) -> bool {
        let now = self.clock.now();
        let window = self.config.window();
        let mut windows = self.lock();

        match windows.get_mut(key) {
            None => {
                windows.insert(key.to_string(), RateWindow::start(now));
                true
            }
            Some(entry) => {
                entry.last_activity = now;
                if now - entry.window_start >= window {
                    entry.count = 1;
                    entry.window_start = now;
                    true
                } else if entry.count >= self.config.max_requests {
                    false
                } else {
                    entry.count += 1;
                    true
                }
            }
        }
    }

    /// Like [`allow`](Self::allow) but reports the denial as an error
    #[track_caller]
    pub fn check(&self, key: &str) -> AuthErrorResult<()> {
        if self.allow(key) {
            return Ok(());
        }
        Err(AuthError::RateLimitExceeded {
            limit: self.config.max_requests,
            window_secs: self.config.window_secs,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Drop keys idle for more than twice the window. Returns how many went.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let idle_limit = self.config.window().checked_mul(2).unwrap_or(Duration::MAX);
        let mut windows = self.lock();

        let before = windows.len();
        windows.retain(|_, entry| now - entry.last_activity <= idle_limit);
        let removed = before - windows.len();

        if removed > 0 {
            debug!("Rate limiter '{}' evicted {} idle keys", self.name, removed);
        }
        removed
    }

    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    /// Run [`sweep`](Self::sweep) on a fixed interval until the task is aborted
    pub fn spawn_sweeper(self: &Arc<Self>, interval: StdDuration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.sweep();
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateWindow>> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }
}
