use std::sync::LazyLock;

use regex::Regex;

pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Lowercased and trimmed; every comparison and every write uses this form
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email_normalized: &str) -> bool {
    if email_normalized.is_empty() || email_normalized.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    EMAIL_SHAPE.is_match(email_normalized)
}
