use crate::MaybeAuthenticated;

use axum::{body::Body, extract::FromRequestParts, http::Request};

#[tokio::test]
async fn given_anonymous_request_when_extracted_then_none() {
    // Given
    let request = Request::builder().body(Body::empty()).unwrap();
    let (mut parts, _body) = request.into_parts();

    // When
    let MaybeAuthenticated(context) = MaybeAuthenticated::from_request_parts(&mut parts, &())
        .await
        .unwrap();

    // Then
    assert!(context.is_none());
}
