//! Public account endpoints: register, login, refresh and logout.

use crate::{
    ApiError, ApiResult, AppState, LoginResponse, MaybeAuthenticated, RefreshRequest,
    RegisterResponse, SuccessResponse,
    api::auth::{
        login_response::TOKEN_TYPE_BEARER,
        refresh_cookie::{REFRESH_COOKIE, clear_refresh_cookie, refresh_cookie},
    },
    client_info::ClientInfo,
};

use tp_auth::{AuthError, AuthServiceError, LoginCredentials, Registration, email::normalize_email};

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use log::{info, warn};

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    client: ClientInfo,
    body: Result<Json<Registration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(request) = body?;
    let email = normalize_email(&request.email);

    match state.auth.register(request).await {
        Ok(user) => {
            info!(
                "User registered: {} ({}) from {}",
                user.id, user.email, client.ip
            );
            state.audit.registration(&client, user.id, &user.email);
            Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
        }
        Err(e) => {
            warn!("Registration failed for '{}' from {}: {}", email, client.ip, e);
            state.audit.registration_failed(&client, &email, failure_reason(&e));
            Err(e.into())
        }
    }
}

/// POST /api/v1/auth/login
///
/// Issues an access/refresh pair and sets the refresh cookie.
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    jar: CookieJar,
    body: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let Json(credentials) = body?;
    let email = normalize_email(&credentials.email);

    let user = match state.auth.login(credentials).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Login failed for '{}' from {}: {}", email, client.ip, e);
            state.audit.login_failed(&client, &email, failure_reason(&e));
            return Err(e.into());
        }
    };

    let pair = state
        .tokens
        .generate_token_pair(user.id, &user.email, user.is_active)?;

    info!("User logged in: {} ({}) from {}", user.id, user.email, client.ip);
    state.audit.login_success(&client, user.id, &user.email);

    let jar = jar.add(refresh_cookie(&pair, state.cookie_secure));

    Ok((
        jar,
        Json(LoginResponse {
            user: user.into(),
            access_token: pair.access.token,
            refresh_token: Some(pair.refresh.token),
            token_type: TOKEN_TYPE_BEARER,
            expires_in: state.tokens.access_ttl().num_seconds(),
            message: "Login successful".to_string(),
        }),
    ))
}

/// POST /api/v1/auth/refresh
///
/// The refresh token comes from the JSON body, else the refresh cookie. Any
/// failure clears the cookie.
pub async fn refresh(
    State(state): State<AppState>,
    client: ClientInfo,
    jar: CookieJar,
    body: Bytes,
) -> Response {
    let token = serde_json::from_slice::<RefreshRequest>(&body)
        .ok()
        .map(|request| request.refresh_token)
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        warn!("No refresh token provided from {}", client.ip);
        return ApiError::bad_request("MISSING_REFRESH_TOKEN", "Please provide a refresh token")
            .into_response();
    };

    match state.auth.refresh_token(&token).await {
        Ok((issued, user)) => {
            state.audit.token_refresh(&client, user.id, &user.email);

            Json(LoginResponse {
                user: user.into(),
                access_token: issued.token,
                refresh_token: None,
                token_type: TOKEN_TYPE_BEARER,
                expires_in: state.tokens.access_ttl().num_seconds(),
                message: "Token refreshed successfully".to_string(),
            })
            .into_response()
        }
        Err(e) => {
            warn!("Token refresh failed from {}: {}", client.ip, e);
            let cleared = jar.add(clear_refresh_cookie(state.cookie_secure));
            (cleared, refresh_rejection(e)).into_response()
        }
    }
}

/// POST /api/v1/auth/logout
///
/// Nothing is revoked server-side; the client drops its tokens and the
/// refresh cookie is expired.
pub async fn logout(
    State(state): State<AppState>,
    MaybeAuthenticated(context): MaybeAuthenticated,
    client: ClientInfo,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    state.auth.logout(context.as_ref().map(|ctx| ctx.user_id));
    state.audit.logout(
        &client,
        context.as_ref().map(|ctx| (ctx.user_id, ctx.email.as_str())),
    );

    (
        jar.add(clear_refresh_cookie(state.cookie_secure)),
        Json(SuccessResponse::new("Logged out successfully")),
    )
}

// =============================================================================
// Helpers
// =============================================================================

/// Short audit reason; detail stays in the application log
fn failure_reason(e: &AuthServiceError) -> &'static str {
    match e {
        AuthServiceError::Validation { .. } => "validation failed",
        AuthServiceError::UserAlreadyExists { .. } => "user already exists",
        AuthServiceError::InvalidCredentials { .. } => "invalid credentials",
        AuthServiceError::UserInactive { .. } => "account inactive",
        AuthServiceError::EmailNotVerified { .. } => "email not verified",
        AuthServiceError::WeakPassword { .. } => "weak password",
        AuthServiceError::UserNotFound { .. } => "user not found",
        AuthServiceError::Token { .. } => "token error",
        AuthServiceError::Timeout { .. } => "timeout",
        AuthServiceError::Internal { .. } => "internal error",
    }
}

fn refresh_rejection(e: AuthServiceError) -> ApiError {
    match e {
        AuthServiceError::Token {
            source: AuthError::TokenExpired { .. },
            ..
        } => ApiError::unauthorized("REFRESH_TOKEN_EXPIRED", "Please login again"),
        AuthServiceError::Token { source, .. } if source.is_token_rejection() => {
            ApiError::unauthorized("INVALID_REFRESH_TOKEN", "Please login again")
        }
        AuthServiceError::UserNotFound { .. } => {
            ApiError::unauthorized("USER_NOT_FOUND", "Please login again")
        }
        other => other.into(),
    }
}
