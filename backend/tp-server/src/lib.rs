pub mod api;
pub mod app_state;
pub mod audit;
pub mod client_info;
pub mod error;
pub mod health;
pub mod logger;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    auth::{
        auth::{login, logout, refresh, register},
        login_response::LoginResponse,
        profile::{change_password, get_profile, session, update_profile},
        refresh_request::RefreshRequest,
        register_response::RegisterResponse,
        session_response::SessionResponse,
        success_response::SuccessResponse,
        user_dto::UserDto,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::{
        authenticated_user::AuthenticatedUser, maybe_authenticated::MaybeAuthenticated,
    },
};
pub use app_state::AppState;
pub use audit::{AuditEvent, AuditEventType, AuditLogger};
pub use client_info::ClientInfo;
pub use error::{Result as ServerErrorResult, ServerError};

pub use crate::routes::build_router;
