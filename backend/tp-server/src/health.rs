use crate::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::warn;
use serde_json::json;
use sqlx::SqlitePool;

/// GET /health - Component status
pub async fn health(State(state): State<AppState>) -> Response {
    let database_ok = ping_database(&state.pool).await;

    let health = json!({
        "status": if database_ok { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "auth": "operational",
            "database": if database_ok { "operational" } else { "unavailable" },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe; not ready while the database is unreachable
pub async fn readiness(State(state): State<AppState>) -> Response {
    if ping_database(&state.pool).await {
        (StatusCode::OK, "Ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Ready").into_response()
    }
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics recorder not installed").into_response(),
    }
}

async fn ping_database(pool: &SqlitePool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    }
}
