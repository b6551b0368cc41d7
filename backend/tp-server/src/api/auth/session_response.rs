use tp_auth::AuthContext;

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Option<AuthContext>> for SessionResponse {
    fn from(context: Option<AuthContext>) -> Self {
        match context {
            Some(ctx) => Self {
                authenticated: true,
                user_id: Some(ctx.user_id),
                email: Some(ctx.email),
            },
            None => Self {
                authenticated: false,
                user_id: None,
                email: None,
            },
        }
    }
}
