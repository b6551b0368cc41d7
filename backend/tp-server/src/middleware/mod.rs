pub mod auth;
pub mod brute_force;
pub mod rate_limit;
pub mod security_headers;
