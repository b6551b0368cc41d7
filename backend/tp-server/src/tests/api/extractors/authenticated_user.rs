use crate::AuthenticatedUser;

use tp_auth::{AuthContext, Claims, TokenType};

use axum::{body::Body, extract::FromRequestParts, http::Request};
use uuid::Uuid;

fn context() -> AuthContext {
    let user_id = Uuid::new_v4();
    AuthContext::from_claims(Claims {
        user_id,
        email: "user@example.com".to_string(),
        is_active: true,
        token_type: TokenType::Access,
        iss: "Trecplans".to_string(),
        sub: user_id.to_string(),
        aud: "trecplans".to_string(),
        exp: 2_000_000_000,
        nbf: 1_000_000_000,
        iat: 1_000_000_000,
        jti: Uuid::new_v4().to_string(),
    })
}

#[tokio::test]
async fn given_context_in_extensions_when_extracted_then_returns_it() {
    // Given
    let expected = context();
    let mut request = Request::builder().body(Body::empty()).unwrap();
    request.extensions_mut().insert(expected.clone());
    let (mut parts, _body) = request.into_parts();

    // When
    let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

    // Then
    let AuthenticatedUser(actual) = result.unwrap();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn given_no_context_when_extracted_then_rejects_with_auth_required() {
    // Given
    let request = Request::builder().body(Body::empty()).unwrap();
    let (mut parts, _body) = request.into_parts();

    // When
    let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

    // Then
    let error = result.unwrap_err();
    assert_eq!(error.code(), "AUTH_REQUIRED");
}
