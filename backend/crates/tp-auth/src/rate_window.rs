use chrono::{DateTime, Utc};

/// Counter state for one client key inside one limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub window_start: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl RateWindow {
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            window_start: now,
            last_activity: now,
        }
    }
}
