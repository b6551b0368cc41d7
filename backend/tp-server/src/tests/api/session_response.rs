use crate::SessionResponse;

#[test]
fn given_anonymous_session_when_serialized_then_only_authenticated_flag() {
    // Given
    let response = SessionResponse::from(None);

    // When
    let json = serde_json::to_value(&response).unwrap();

    // Then
    assert_eq!(json, serde_json::json!({ "authenticated": false }));
}
