use chrono::Duration;

/// Fixed-window policy for one limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    pub const fn login() -> Self {
        Self::new(5, 15 * 60)
    }

    pub const fn register() -> Self {
        Self::new(3, 60 * 60)
    }

    pub const fn auth() -> Self {
        Self::new(20, 15 * 60)
    }

    pub const fn general() -> Self {
        Self::new(1000, 60 * 60)
    }

    pub fn window(&self) -> Duration {
        i64::try_from(self.window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::general()
    }
}
