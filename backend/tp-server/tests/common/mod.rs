#![allow(dead_code)]

//! Test infrastructure for tp-server API tests

use tp_auth::{
    AuthService, BruteForceGuard, Clock, ManualClock, PasswordPolicy, RateLimitConfig,
    RateLimiterSet, RateLimiterSetConfig, TokenService, TokenServiceConfig,
};
use tp_db::UserRepository;
use tp_server::{AppState, AuditLogger, build_router};

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-with-32-plus-chars";
pub const TEST_PASSWORD: &str = "Str0ng!Passw0rd#";
pub const ACCESS_TTL_MINUTES: i64 = 15;
pub const REFRESH_TTL_HOURS: i64 = 24;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

/// Every class far above anything a test sends
pub fn relaxed_limits() -> RateLimiterSetConfig {
    let roomy = RateLimitConfig::new(1_000, 3_600);
    RateLimiterSetConfig {
        login: roomy,
        register: roomy,
        auth: roomy,
        general: roomy,
    }
}

/// Create a test pool with in-memory SQLite
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:")
        .await
        .expect("Failed to create test database");

    tp_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_limits(relaxed_limits()).await
}

pub async fn create_test_app_with_limits(limits: RateLimiterSetConfig) -> TestApp {
    let pool = create_test_pool().await;
    let clock = Arc::new(ManualClock::default());
    let shared: Arc<dyn Clock> = clock.clone();

    let mut token_config = TokenServiceConfig::new(TEST_SECRET);
    token_config.access_ttl = chrono::Duration::minutes(ACCESS_TTL_MINUTES);
    token_config.refresh_ttl = chrono::Duration::hours(REFRESH_TTL_HOURS);
    let tokens = Arc::new(TokenService::new(token_config, Arc::clone(&shared)));

    // Minimum bcrypt cost keeps the suite fast
    let auth = AuthService::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::clone(&tokens),
        PasswordPolicy::new(4),
        Arc::clone(&shared),
    );

    let state = AppState {
        pool,
        auth: Arc::new(auth),
        tokens,
        limiters: RateLimiterSet::new(limits, Arc::clone(&shared)),
        brute_force: Arc::new(BruteForceGuard::new(Arc::clone(&shared))),
        audit: AuditLogger::new(),
        cookie_secure: false,
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        request_timeout: Duration::from_secs(30),
        metrics: None,
    };

    TestApp {
        router: build_router(state.clone()),
        state,
        clock,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn register(&self, email: &str, password: &str) -> Response {
        self.send(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "email": email,
                "password": password,
                "password_confirm": password,
            }),
        ))
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.send(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
    }

    /// Register with [`TEST_PASSWORD`] and return the login body
    pub async fn register_and_login(&self, email: &str) -> Value {
        let registered = self.register(email, TEST_PASSWORD).await;
        assert_eq!(registered.status(), 201);

        let response = self.login(email, TEST_PASSWORD).await;
        assert_eq!(response.status(), 200);
        body_json(response).await
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header missing")
        .to_str()
        .unwrap()
        .to_string()
}
