mod error;
mod extractors;
mod refresh_cookie;
mod session_response;
