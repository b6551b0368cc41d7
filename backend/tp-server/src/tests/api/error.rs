use crate::ApiError;

use tp_auth::{AuthError, AuthServiceError};

use std::panic::Location;

use axum::{http::StatusCode, response::IntoResponse};
use error_location::ErrorLocation;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_validation_error_with_field_when_rendered_then_400_with_field_detail() {
    // Given
    let error = ApiError::validation("Email is required", Some("email"));

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["message"], "Email is required");
    assert_eq!(json["error"]["details"]["field"], "email");
}

#[tokio::test]
async fn given_weak_password_when_rendered_then_reasons_are_listed() {
    // Given
    let error = ApiError::from(AuthServiceError::WeakPassword {
        reasons: vec!["Password must contain at least one number".to_string()],
        location: ErrorLocation::from(Location::caller()),
    });

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "WEAK_PASSWORD");
    assert_eq!(
        json["error"]["details"]["reasons"][0],
        "Password must contain at least one number"
    );
}

#[tokio::test]
async fn given_duplicate_user_when_rendered_then_409_user_exists() {
    // Given
    let error = ApiError::from(AuthServiceError::UserAlreadyExists {
        location: ErrorLocation::from(Location::caller()),
    });

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "USER_EXISTS");
}

#[tokio::test]
async fn given_internal_error_when_rendered_then_detail_is_not_exposed() {
    // Given
    let error = ApiError::from(AuthServiceError::internal(
        "database is locked: users table",
    ));

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    assert!(!json["error"]["message"].as_str().unwrap().contains("database"));
}

#[tokio::test]
async fn given_expired_token_when_rendered_then_401_token_expired() {
    // Given
    let error = ApiError::from(AuthError::TokenExpired {
        location: ErrorLocation::from(Location::caller()),
    });

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "TOKEN_EXPIRED");
    assert_eq!(
        json["error"]["message"],
        "Your session has expired. Please login again"
    );
}

#[tokio::test]
async fn given_inactive_user_when_rendered_then_403() {
    // Given
    let error = ApiError::from(AuthServiceError::UserInactive {
        location: ErrorLocation::from(Location::caller()),
    });

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "ACCOUNT_INACTIVE");
}

#[tokio::test]
async fn given_store_timeout_when_rendered_then_500_timeout() {
    // Given
    let error = ApiError::from(AuthServiceError::Timeout {
        operation: "find_by_email",
        location: ErrorLocation::from(Location::caller()),
    });

    // When
    let (status, json) = body_json(error).await;

    // Then
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "TIMEOUT");
}

#[test]
fn given_auth_required_when_inspected_then_401_with_auth_required_code() {
    // Given
    let error = ApiError::auth_required();

    // Then
    assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error.code(), "AUTH_REQUIRED");
}

#[tokio::test]
async fn given_password_too_long_when_rendered_then_400_on_password_field() {
    let error = ApiError::from(AuthError::PasswordTooLong {
        max_bytes: 72,
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["error"]["message"],
        "Password must be no more than 72 bytes long"
    );
    assert_eq!(json["error"]["details"]["field"], "password");
}
