use std::fmt;

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const AUTH_PREFIX: &str = "/api/v1/auth";

/// Route class that picks which limiter guards a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitClass {
    Login,
    Register,
    Auth,
    General,
}

impl LimitClass {
    /// Exact method+path first, then the auth prefix, then general
    pub fn select(method: &str, path: &str) -> Self {
        let is_post = method.eq_ignore_ascii_case("POST");
        if is_post && path == LOGIN_PATH {
            Self::Login
        } else if is_post && path == REGISTER_PATH {
            Self::Register
        } else if path.starts_with(AUTH_PREFIX) {
            Self::Auth
        } else {
            Self::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Auth => "auth",
            Self::General => "general",
        }
    }

    /// Client-facing explanation used in 429 responses
    pub fn message(&self) -> &'static str {
        match self {
            Self::Login => "Too many login attempts. Please wait 15 minutes before trying again.",
            Self::Register => {
                "Too many registration attempts. Please wait 1 hour before trying again."
            }
            Self::Auth => {
                "Too many authentication requests. Please wait 15 minutes before trying again."
            }
            Self::General => "Too many requests. Please slow down your request rate.",
        }
    }
}

impl fmt::Display for LimitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
