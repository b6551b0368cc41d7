use super::memory_store::MemoryUserStore;

use crate::{
    AuthError, AuthService, AuthServiceError, LoginCredentials, ManualClock, PasswordChange,
    PasswordPolicy, ProfileUpdate, Registration, TokenService, TokenServiceConfig,
};

use std::{sync::Arc, time::Duration as StdDuration};

use chrono::{Duration, Utc};
use googletest::prelude::*;
use uuid::Uuid;

const PASSWORD: &str = "StrongP@ss1";

struct Harness {
    service: AuthService,
    store: Arc<MemoryUserStore>,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = Arc::new(MemoryUserStore::new());
    let tokens = Arc::new(TokenService::new(
        TokenServiceConfig::new("test-secret-key-at-least-32-bytes-long"),
        clock.clone(),
    ));
    let service = AuthService::new(store.clone(), tokens, PasswordPolicy::new(4), clock.clone());
    Harness {
        service,
        store,
        clock,
    }
}

fn registration(email: &str) -> Registration {
    Registration {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        password_confirm: PASSWORD.to_string(),
        first_name: Some("  Alice ".to_string()),
        last_name: None,
    }
}

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn given_new_email_when_registered_then_user_is_stored_normalized() {
    // Given
    let h = harness();

    // When
    let user = h
        .service
        .register(registration("  Alice@Example.com "))
        .await
        .unwrap();

    // Then
    assert_that!(user.email.as_str(), eq("alice@example.com"));
    assert_that!(user.first_name.as_deref(), some(eq("Alice")));
    assert_that!(user.is_active, eq(true));
    assert_that!(user.email_verified, eq(false));
    assert_ne!(user.password_hash, PASSWORD);
    assert!(h.store.get(user.id).is_some());
}

#[tokio::test]
async fn given_existing_email_when_registered_again_then_user_already_exists() {
    let h = harness();
    h.service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    let result = h.service.register(registration("ALICE@example.com")).await;

    assert!(matches!(result, Err(AuthServiceError::UserAlreadyExists { .. })));
}

#[tokio::test]
async fn given_lookup_misses_duplicate_when_store_rejects_then_user_already_exists() {
    // Given: the pre-check cannot see the existing row
    let h = harness();
    h.service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    h.store.hide_from_lookup();

    // When
    let result = h.service.register(registration("alice@example.com")).await;

    // Then
    assert!(matches!(result, Err(AuthServiceError::UserAlreadyExists { .. })));
}

#[tokio::test]
async fn given_weak_password_when_registered_then_reasons_returned() {
    let h = harness();
    let mut request = registration("bob@example.com");
    request.password = "password".to_string();
    request.password_confirm = "password".to_string();

    let result = h.service.register(request).await;

    match result {
        Err(AuthServiceError::WeakPassword { reasons, .. }) => {
            assert!(reasons.iter().any(|r| r.contains("too common")));
        }
        other => panic!("expected WeakPassword, got {other:?}"),
    }
}

#[tokio::test]
async fn given_mismatched_confirmation_when_registered_then_validation_error() {
    let h = harness();
    let mut request = registration("bob@example.com");
    request.password_confirm = "StrongP@ss2".to_string();

    let result = h.service.register(request).await;

    assert!(matches!(
        result,
        Err(AuthServiceError::Validation { field: Some(ref f), .. }) if f == "password_confirm"
    ));
}

#[tokio::test]
async fn given_malformed_email_when_registered_then_validation_error() {
    let h = harness();

    let result = h.service.register(registration("not-an-email")).await;

    assert!(matches!(result, Err(AuthServiceError::Validation { .. })));
}

#[tokio::test]
async fn given_overlong_name_when_registered_then_validation_error() {
    let h = harness();
    let mut request = registration("bob@example.com");
    request.last_name = Some("x".repeat(101));

    let result = h.service.register(request).await;

    assert!(matches!(result, Err(AuthServiceError::Validation { .. })));
}

#[tokio::test]
async fn given_registered_user_when_login_with_correct_password_then_metadata_updated() {
    // Given
    let h = harness();
    let registered = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    h.clock.advance(Duration::minutes(1));

    // When
    let user = h
        .service
        .login(credentials(" ALICE@example.com", PASSWORD))
        .await
        .unwrap();

    // Then
    assert_that!(user.id, eq(registered.id));
    assert_that!(user.login_count, eq(1));
    assert_that!(user.last_login_at, some(eq(h.clock_now())));
    assert_that!(h.store.get(user.id).unwrap().login_count, eq(1));
}

#[tokio::test]
async fn given_wrong_password_and_unknown_email_when_login_then_same_error() {
    let h = harness();
    h.service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    let wrong_password = h
        .service
        .login(credentials("alice@example.com", "Wrong#Pass9"))
        .await;
    let unknown_email = h
        .service
        .login(credentials("nobody@example.com", PASSWORD))
        .await;

    assert!(matches!(
        wrong_password,
        Err(AuthServiceError::InvalidCredentials { .. })
    ));
    assert!(matches!(
        unknown_email,
        Err(AuthServiceError::InvalidCredentials { .. })
    ));
}

#[tokio::test]
async fn given_inactive_user_when_login_then_user_inactive() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    h.service.deactivate_user(user.id).await.unwrap();

    let result = h
        .service
        .login(credentials("alice@example.com", PASSWORD))
        .await;

    assert!(matches!(result, Err(AuthServiceError::UserInactive { .. })));
}

#[tokio::test]
async fn given_failing_metadata_save_when_login_then_login_still_succeeds() {
    let h = harness();
    h.service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    h.store.fail_saves();

    let result = h
        .service
        .login(credentials("alice@example.com", PASSWORD))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_deactivation_during_login_when_login_completes_then_account_stays_inactive() {
    // Given
    let h = harness();
    let registered = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    h.store.deactivate_after_next_lookup();

    // When
    let result = h
        .service
        .login(credentials("alice@example.com", PASSWORD))
        .await;

    // Then
    assert!(result.is_ok());
    let stored = h.store.get(registered.id).unwrap();
    assert_that!(stored.is_active, eq(false));
    assert_that!(stored.login_count, eq(1));
    assert_that!(stored.password_hash.as_str(), eq(registered.password_hash.as_str()));
}

#[tokio::test]
async fn given_stalled_store_when_login_then_timeout_error() {
    // Given
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = Arc::new(MemoryUserStore::new());
    store.stall_for(StdDuration::from_millis(500));
    let tokens = Arc::new(TokenService::new(
        TokenServiceConfig::new("test-secret-key-at-least-32-bytes-long"),
        clock.clone(),
    ));
    let service = AuthService::new(store, tokens, PasswordPolicy::new(4), clock)
        .with_store_timeout(StdDuration::from_millis(20));

    // When
    let result = service
        .login(credentials("alice@example.com", PASSWORD))
        .await;

    // Then
    assert!(matches!(result, Err(AuthServiceError::Timeout { .. })));
}

#[tokio::test]
async fn given_valid_refresh_token_when_refreshed_then_new_access_token_for_user() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    let pair = h
        .service
        .tokens()
        .generate_token_pair(user.id, &user.email, true)
        .unwrap();

    let (access, refreshed_user) = h.service.refresh_token(&pair.refresh.token).await.unwrap();

    let claims = h.service.validate_access_token(&access.token).unwrap();
    assert_that!(claims.user_id, eq(user.id));
    assert_that!(refreshed_user.id, eq(user.id));
}

#[tokio::test]
async fn given_deleted_user_when_refreshed_then_user_not_found() {
    let h = harness();
    let pair = h
        .service
        .tokens()
        .generate_token_pair(Uuid::new_v4(), "ghost@example.com", true)
        .unwrap();

    let result = h.service.refresh_token(&pair.refresh.token).await;

    assert!(matches!(result, Err(AuthServiceError::UserNotFound { .. })));
}

#[tokio::test]
async fn given_deactivated_user_when_refreshed_then_user_inactive() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    let pair = h
        .service
        .tokens()
        .generate_token_pair(user.id, &user.email, true)
        .unwrap();
    h.service.deactivate_user(user.id).await.unwrap();

    let result = h.service.refresh_token(&pair.refresh.token).await;

    assert!(matches!(result, Err(AuthServiceError::UserInactive { .. })));
}

#[tokio::test]
async fn given_access_token_when_used_to_refresh_then_token_claim_error() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    let pair = h
        .service
        .tokens()
        .generate_token_pair(user.id, &user.email, true)
        .unwrap();

    let result = h.service.refresh_token(&pair.access.token).await;

    assert!(matches!(
        result,
        Err(AuthServiceError::Token {
            source: AuthError::InvalidClaim { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn given_expired_refresh_token_when_refreshed_then_token_expired() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    let pair = h
        .service
        .tokens()
        .generate_token_pair(user.id, &user.email, true)
        .unwrap();

    h.clock.advance(Duration::hours(168));
    let result = h.service.refresh_token(&pair.refresh.token).await;

    assert!(matches!(
        result,
        Err(AuthServiceError::Token {
            source: AuthError::TokenExpired { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn given_correct_current_password_when_changed_then_new_password_logs_in() {
    // Given
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    // When
    h.service
        .change_password(
            user.id,
            PasswordChange {
                current_password: PASSWORD.to_string(),
                new_password: "N3w!Harbor".to_string(),
                password_confirm: "N3w!Harbor".to_string(),
            },
        )
        .await
        .unwrap();

    // Then
    let old = h
        .service
        .login(credentials("alice@example.com", PASSWORD))
        .await;
    let new = h
        .service
        .login(credentials("alice@example.com", "N3w!Harbor"))
        .await;
    assert!(matches!(old, Err(AuthServiceError::InvalidCredentials { .. })));
    assert!(new.is_ok());
}

#[tokio::test]
async fn given_wrong_current_password_when_changed_then_invalid_credentials() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    let result = h
        .service
        .change_password(
            user.id,
            PasswordChange {
                current_password: "Wrong#Pass9".to_string(),
                new_password: "N3w!Harbor".to_string(),
                password_confirm: "N3w!Harbor".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials { .. })));
}

#[tokio::test]
async fn given_weak_new_password_when_changed_then_weak_password() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    let result = h
        .service
        .change_password(
            user.id,
            PasswordChange {
                current_password: PASSWORD.to_string(),
                new_password: "abc".to_string(),
                password_confirm: "abc".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AuthServiceError::WeakPassword { .. })));
}

#[tokio::test]
async fn given_profile_update_when_applied_then_names_trimmed_and_saved() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    let updated = h
        .service
        .update_profile(
            user.id,
            ProfileUpdate {
                first_name: None,
                last_name: Some(" Liddell ".to_string()),
            },
        )
        .await
        .unwrap();

    assert_that!(updated.full_name().as_str(), eq("Alice Liddell"));
    assert_that!(
        h.store.get(user.id).unwrap().last_name.as_deref(),
        some(eq("Liddell"))
    );
}

#[tokio::test]
async fn given_unknown_user_when_fetched_then_user_not_found() {
    let h = harness();

    let get = h.service.get_user(Uuid::new_v4()).await;
    let deactivate = h.service.deactivate_user(Uuid::new_v4()).await;
    let verify = h.service.verify_email(Uuid::new_v4()).await;

    assert!(matches!(get, Err(AuthServiceError::UserNotFound { .. })));
    assert!(matches!(deactivate, Err(AuthServiceError::UserNotFound { .. })));
    assert!(matches!(verify, Err(AuthServiceError::UserNotFound { .. })));
}

#[tokio::test]
async fn given_unverified_user_when_email_verified_then_flag_and_timestamp_set() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();

    h.service.verify_email(user.id).await.unwrap();

    let stored = h.store.get(user.id).unwrap();
    assert!(stored.is_email_verified());
    assert_that!(stored.email_verified_at, some(eq(h.clock_now())));
}

#[tokio::test]
async fn given_deactivated_user_when_fetched_then_user_not_found() {
    let h = harness();
    let user = h
        .service
        .register(registration("alice@example.com"))
        .await
        .unwrap();
    h.service.deactivate_user(user.id).await.unwrap();

    let result = h.service.get_user(user.id).await;

    assert!(matches!(result, Err(AuthServiceError::UserNotFound { .. })));
}

impl Harness {
    fn clock_now(&self) -> chrono::DateTime<Utc> {
        use crate::Clock;
        self.clock.now()
    }
}
