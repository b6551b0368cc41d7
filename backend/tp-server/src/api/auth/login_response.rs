use crate::UserDto;

use serde::Serialize;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Body for login and refresh. Refresh omits `refresh_token`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserDto,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub message: String,
}
