//! Inputs to the account use cases. Password-bearing types redact their
//! secrets from `Debug` output.

use std::fmt;

use serde::Deserialize;

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone, Default, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { <redacted> }")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}
