//! Per-class request limits, applied before routing.

use crate::{ApiError, AppState, client_info::ClientInfo};

use tp_auth::{AuthContext, ClientKey};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use log::warn;
use metrics::counter;

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = ClientInfo::from_request(request.headers(), request.extensions());
    let user_id = request.extensions().get::<AuthContext>().map(|ctx| ctx.user_id);
    let key = ClientKey::resolve(user_id, &client.ip, &client.user_agent);

    let method = request.method().as_str();
    let path = request.uri().path();

    if let Err(class) = state.limiters.allow(method, path, key.as_str()) {
        warn!(
            "Rate limit exceeded: client={} path={} method={} limit_type={} ip={}",
            key, path, method, class, client.ip
        );
        counter!("tp_auth.rate_limit_rejections", "class" => class.as_str()).increment(1);
        return Err(ApiError::too_many_requests(
            "RATE_LIMIT_EXCEEDED",
            class.message(),
        ));
    }

    Ok(next.run(request).await)
}
