pub mod auth;
pub mod login_response;
pub mod profile;
pub mod refresh_cookie;
pub mod refresh_request;
pub mod register_response;
pub mod session_response;
pub mod success_response;
pub mod user_dto;
