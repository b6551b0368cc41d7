use crate::{
    ApiError, AppState,
    api::{
        auth::{auth, profile},
        ping,
    },
    health,
    middleware::{
        auth::{optional_auth, require_auth},
        brute_force::brute_force,
        rate_limit::rate_limit,
        security_headers::security_headers,
    },
};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use log::warn;
use tower::{ServiceBuilder, timeout::TimeoutLayer, timeout::error::Elapsed};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the application router with all endpoints.
///
/// Request flow, outermost first: CORS, security headers, rate limit, brute
/// force, request timeout, then the route (with `require_auth` or
/// `optional_auth` where the route asks for it).
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/ping", get(ping::ping));

    let optional = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(profile::session))
        .route_layer(from_fn_with_state(state.clone(), optional_auth));

    let protected = Router::new()
        .route(
            "/auth/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/auth/password", put(profile::change_password))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let cors = cors_layer(&state.cors_allowed_origins);
    let timeout = state.request_timeout;

    Router::new()
        .nest("/api/v1", public.merge(optional).merge(protected))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        // Layers wrap outward: the last one added sees the request first
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(from_fn_with_state(state.clone(), brute_force))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(from_fn(security_headers))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn handle_timeout(e: BoxError) -> ApiError {
    if e.is::<Elapsed>() {
        warn!("Request exceeded the configured timeout");
        ApiError::internal("TIMEOUT", "The request timed out. Please try again later")
    } else {
        log::error!("Unhandled middleware error: {}", e);
        ApiError::internal("INTERNAL_ERROR", "An internal error occurred")
    }
}
