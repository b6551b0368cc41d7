//! The refresh token's HTTP-only cookie.

use tp_auth::TokenPair;

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub const REFRESH_COOKIE: &str = "refresh_token";
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

/// Lives for the gap between access and refresh expiry, so the browser drops
/// it once the refresh token could no longer outlast a fresh access token.
pub fn refresh_cookie(pair: &TokenPair, secure: bool) -> Cookie<'static> {
    build(
        pair.refresh.token.clone(),
        Duration::seconds(pair.refresh_window_secs()),
        secure,
    )
}

/// Max-Age=0 with the same path, so the browser deletes it
pub fn clear_refresh_cookie(secure: bool) -> Cookie<'static> {
    build(String::new(), Duration::ZERO, secure)
}

fn build(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, value))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}
