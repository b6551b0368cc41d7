use crate::api::auth::refresh_cookie::{
    REFRESH_COOKIE, REFRESH_COOKIE_PATH, clear_refresh_cookie, refresh_cookie,
};

use tp_auth::{ManualClock, TokenService, TokenServiceConfig};

use std::sync::Arc;

use axum_extra::extract::cookie::SameSite;
use chrono::{Duration, Utc};
use uuid::Uuid;

const SECRET: &str = "an-integration-secret-of-at-least-32-chars";

#[test]
fn given_token_pair_when_cookie_built_then_lifetime_is_gap_between_expiries() {
    // Given
    let mut config = TokenServiceConfig::new(SECRET);
    config.access_ttl = Duration::hours(1);
    config.refresh_ttl = Duration::hours(5);
    let tokens = TokenService::new(config, Arc::new(ManualClock::new(Utc::now())));
    let pair = tokens
        .generate_token_pair(Uuid::new_v4(), "user@example.com", true)
        .unwrap();

    // When
    let cookie = refresh_cookie(&pair, true);

    // Then
    assert_eq!(cookie.name(), REFRESH_COOKIE);
    assert_eq!(cookie.value(), pair.refresh.token);
    assert_eq!(cookie.path(), Some(REFRESH_COOKIE_PATH));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.max_age(), Some(time::Duration::hours(4)));
}

#[test]
fn given_clear_cookie_when_built_then_expires_immediately() {
    // When
    let cookie = clear_refresh_cookie(false);

    // Then
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    assert_eq!(cookie.secure(), Some(false));
}
