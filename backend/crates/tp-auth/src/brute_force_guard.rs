use crate::{AuthError, Clock, FailureRecord, Result as AuthErrorResult};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use log::info;

/// Per-client failed-login counter with escalating lockouts.
///
/// The pre-check and the post-response update are separate critical
/// sections; no lock is held while the login itself runs.
pub struct BruteForceGuard {
    failures: Mutex<HashMap<String, FailureRecord>>,
    clock: Arc<dyn Clock>,
}

impl BruteForceGuard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn is_blocked(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut failures = self.lock();
        failures
            .get_mut(key)
            .is_some_and(|record| record.is_blocked(now))
    }

    /// Pre-request gate
    #[track_caller]
    pub fn check(&self, key: &str) -> AuthErrorResult<()> {
        if self.is_blocked(key) {
            return Err(AuthError::AccountLocked {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Returns the updated failure count
    pub fn record_failure(&self, key: &str) -> u32 {
        let now = self.clock.now();
        let mut failures = self.lock();
        let record = failures
            .entry(key.to_string())
            .and_modify(|record| record.record_failure(now))
            .or_insert_with(|| FailureRecord::first(now));

        info!(
            "Failed login attempt recorded for {} (attempt {})",
            key, record.count
        );
        record.count
    }

    pub fn record_success(&self, key: &str) {
        self.lock().remove(key);
    }

    pub fn failure_count(&self, key: &str) -> u32 {
        self.lock().get(key).map_or(0, |record| record.count)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, FailureRecord>> {
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }
}
