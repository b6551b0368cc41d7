//! Login lockout: check before the handler, record after it answers.

use crate::{ApiError, AppState, client_info::ClientInfo};

use tp_auth::{ClientKey, limit_class::LOGIN_PATH};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use log::warn;
use metrics::counter;

/// Only the login path is guarded. A 401 from the handler counts as a failed
/// attempt and a 200 clears the record; other statuses leave it untouched.
pub async fn brute_force(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.uri().path() != LOGIN_PATH {
        return Ok(next.run(request).await);
    }

    let client = ClientInfo::from_request(request.headers(), request.extensions());
    let key = ClientKey::for_client(&client.ip, &client.user_agent);

    if state.brute_force.is_blocked(key.as_str()) {
        let failures = state.brute_force.failure_count(key.as_str());
        warn!(
            "Brute force protection triggered: client={} failed_attempts={} ip={}",
            key, failures, client.ip
        );
        counter!("tp_auth.lockout_rejections").increment(1);
        state.audit.account_lock(&client, key.as_str(), failures);
        return Err(ApiError::too_many_requests(
            "ACCOUNT_LOCKED",
            "Too many failed login attempts. Please try again later.",
        ));
    }

    let response = next.run(request).await;

    match response.status() {
        StatusCode::UNAUTHORIZED => {
            state.brute_force.record_failure(key.as_str());
            counter!("tp_auth.failed_logins").increment(1);
        }
        StatusCode::OK => state.brute_force.record_success(key.as_str()),
        _ => {}
    }

    Ok(response)
}
