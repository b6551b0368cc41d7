use chrono::{DateTime, Duration, Utc};

/// Failures within this span of the first one count toward a lockout
pub const FAILURE_HORIZON: Duration = Duration::hours(1);

/// Failures needed before any lockout applies
pub const LOCKOUT_THRESHOLD: u32 = 5;

/// Failed-login history for one client key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureRecord {
    pub count: u32,
    pub first_failure: DateTime<Utc>,
    pub last_failure: DateTime<Utc>,
}

impl FailureRecord {
    pub fn first(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            first_failure: now,
            last_failure: now,
        }
    }

    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        // A record that has aged out starts a fresh horizon
        if self.count == 0 || now - self.first_failure > FAILURE_HORIZON {
            *self = Self::first(now);
            return;
        }
        self.count += 1;
        self.last_failure = now;
    }

    /// Escalating lockout length for the current failure count
    pub fn block_duration(&self) -> Option<Duration> {
        match self.count {
            c if c < LOCKOUT_THRESHOLD => None,
            c if c < 10 => Some(Duration::minutes(5)),
            c if c < 15 => Some(Duration::minutes(15)),
            c if c < 20 => Some(Duration::minutes(30)),
            _ => Some(Duration::hours(1)),
        }
    }

    /// Resets the count (without removing the record) once the horizon has
    /// passed, then reports whether a lockout is still running.
    pub fn is_blocked(&mut self, now: DateTime<Utc>) -> bool {
        if now - self.first_failure > FAILURE_HORIZON {
            self.count = 0;
            return false;
        }

        match self.block_duration() {
            Some(duration) => now - self.last_failure < duration,
            None => false,
        }
    }
}
