use crate::{AuthError, PasswordStrength, Result as AuthErrorResult};

use std::{panic::Location, sync::LazyLock};

use error_location::ErrorLocation;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// bcrypt reads at most this many bytes of input
pub const MAX_PASSWORD_BYTES: usize = 72;
pub const MIN_CHARACTER_CLASSES: usize = 3;

pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "123456789",
    "12345678",
    "12345",
    "qwerty",
    "abc123",
    "password123",
    "admin",
    "letmein",
    "welcome",
    "monkey",
    "1234567890",
    "dragon",
    "123123",
    "football",
    "iloveyou",
    "admin123",
    "welcome123",
    "password1",
];

static SEQUENTIAL_DIGITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("012|123|234|345|456|567|678|789|890|987|876|765|654|543|432|321|210")
        .expect("sequential digit pattern is valid")
});

static SEQUENTIAL_LETTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?i)abc|bcd|cde|def|efg|fgh|ghi|hij|ijk|jkl|klm|lmn|mno|nop|opq|pqr|qrs|rst|stu|tuv|uvw|vwx|wxy|xyz|zyx|yxw|xwv|wvu|vut|uts|tsr|srq|rqp|qpo|pon|onm|nml|mlk|lkj|kji|jih|ihg|hgf|gfe|fed|edc|dcb|cba")
        .expect("sequential letter pattern is valid")
});

/// Password strength rules plus bcrypt hashing.
///
/// Stateless apart from the work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    cost: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordPolicy {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Run every rule and collect every failure. Individually missing
    /// character classes are advisory; the 3-of-4 rule is what gates.
    pub fn validate_strength(&self, password: &str) -> PasswordStrength {
        let mut reasons = Vec::new();
        let mut ok = true;
        let length = password.chars().count();

        if length < MIN_PASSWORD_LENGTH {
            ok = false;
            reasons.push(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            ok = false;
            reasons.push(format!(
                "Password must be no more than {} characters long",
                MAX_PASSWORD_LENGTH
            ));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            ok = false;
            reasons.push(format!(
                "Password must be no more than {} bytes long",
                MAX_PASSWORD_BYTES
            ));
        }

        let found = classify(password);

        if !found.upper {
            reasons.push("Password should contain at least one uppercase letter".to_string());
        }
        if !found.lower {
            reasons.push("Password should contain at least one lowercase letter".to_string());
        }
        if !found.digit {
            reasons.push("Password should contain at least one number".to_string());
        }
        if !found.special {
            reasons.push("Password should contain at least one special character".to_string());
        }

        if found.count() < MIN_CHARACTER_CLASSES {
            ok = false;
            reasons.push(format!(
                "Password must meet at least {} of the 4 character type requirements",
                MIN_CHARACTER_CLASSES
            ));
        }

        if is_common_password(password) {
            ok = false;
            reasons.push(
                "Password is too common, please choose a more secure password".to_string(),
            );
        }
        if has_sequential_pattern(password) {
            ok = false;
            reasons.push(
                "Password contains sequential patterns, please choose a more secure password"
                    .to_string(),
            );
        }
        if has_repeated_characters(password) {
            ok = false;
            reasons.push("Password contains too many repeated characters".to_string());
        }

        PasswordStrength { ok, reasons }
    }

    /// Salted bcrypt hash; two calls on the same input give different output.
    /// Input past `MAX_PASSWORD_BYTES` is refused rather than truncated.
    #[track_caller]
    pub fn hash_password(&self, password: &str) -> AuthErrorResult<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordTooLong {
                max_bytes: MAX_PASSWORD_BYTES,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::PasswordHash {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Constant-time comparison is done inside bcrypt. Input that could never
    /// have been hashed is a mismatch.
    #[track_caller]
    pub fn verify_password(&self, password: &str, hash: &str) -> AuthErrorResult<()> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordMismatch {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let matches = bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordHash {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !matches {
            return Err(AuthError::PasswordMismatch {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

/// Exact match against the built-in list
pub fn is_common_password(password: &str) -> bool {
    COMMON_PASSWORDS.contains(&password)
}

/// Three-character ascending or descending run of digits, or of letters in
/// either case
pub fn has_sequential_pattern(password: &str) -> bool {
    SEQUENTIAL_DIGITS.is_match(password) || SEQUENTIAL_LETTERS.is_match(password)
}

/// Three identical consecutive characters
pub fn has_repeated_characters(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

fn classify(password: &str) -> CharacterClasses {
    let mut classes = CharacterClasses::default();
    for c in password.chars() {
        if c.is_uppercase() {
            classes.upper = true;
        } else if c.is_lowercase() {
            classes.lower = true;
        } else if c.is_numeric() {
            classes.digit = true;
        } else if !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control() {
            classes.special = true;
        }
    }
    classes
}

#[derive(Debug, Default)]
struct CharacterClasses {
    upper: bool,
    lower: bool,
    digit: bool,
    special: bool,
}

impl CharacterClasses {
    fn count(&self) -> usize {
        [self.upper, self.lower, self.digit, self.special]
            .iter()
            .filter(|present| **present)
            .count()
    }
}
