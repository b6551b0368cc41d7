//! Endpoints for the signed-in caller.

use crate::{
    ApiError, ApiResult, AppState, AuthenticatedUser, MaybeAuthenticated, SessionResponse,
    SuccessResponse, UserDto, client_info::ClientInfo,
};

use tp_auth::{AuthServiceError, PasswordChange, ProfileUpdate};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use log::warn;

/// GET /api/v1/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(context): AuthenticatedUser,
) -> ApiResult<Json<UserDto>> {
    let user = state.auth.get_user(context.user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(context): AuthenticatedUser,
    client: ClientInfo,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let Json(update) = body?;

    let mut changed = Vec::new();
    if update.first_name.is_some() {
        changed.push("first_name");
    }
    if update.last_name.is_some() {
        changed.push("last_name");
    }

    let user = state.auth.update_profile(context.user_id, update).await?;
    state
        .audit
        .profile_update(&client, user.id, &user.email, &changed);

    Ok(Json(user.into()))
}

/// PUT /api/v1/auth/password
///
/// Issued tokens stay valid after the change.
pub async fn change_password(
    State(state): State<AppState>,
    AuthenticatedUser(context): AuthenticatedUser,
    client: ClientInfo,
    body: Result<Json<PasswordChange>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(change) = body?;

    match state.auth.change_password(context.user_id, change).await {
        Ok(()) => {
            state
                .audit
                .password_change(&client, context.user_id, &context.email, true);
            Ok(Json(SuccessResponse::new("Password changed successfully")))
        }
        Err(AuthServiceError::InvalidCredentials { .. }) => {
            warn!("Password change rejected for {}: wrong current password", context.user_id);
            state
                .audit
                .password_change(&client, context.user_id, &context.email, false);
            Err(ApiError::bad_request(
                "INVALID_PASSWORD",
                "The current password is incorrect",
            ))
        }
        Err(e) => {
            warn!("Password change failed for {}: {}", context.user_id, e);
            state
                .audit
                .password_change(&client, context.user_id, &context.email, false);
            Err(e.into())
        }
    }
}

/// GET /api/v1/auth/session
///
/// Works with or without a token; reports who the caller is, if anyone.
pub async fn session(MaybeAuthenticated(context): MaybeAuthenticated) -> Json<SessionResponse> {
    Json(SessionResponse::from(context))
}
