use crate::audit::AuditLogger;

use tp_auth::{AuthService, BruteForceGuard, RateLimiterSet, TokenService};

use std::{sync::Arc, time::Duration};

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;

/// Services shared by every handler. Built once in `main` (or a test
/// harness) and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub limiters: RateLimiterSet,
    pub brute_force: Arc<BruteForceGuard>,
    pub audit: AuditLogger,
    /// Adds `Secure` to the refresh cookie
    pub cookie_secure: bool,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    /// Absent when no recorder is installed (tests)
    pub metrics: Option<PrometheusHandle>,
}
