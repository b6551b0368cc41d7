//! User entity - the credential record behind every login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// `email` is always stored normalized (trimmed, lowercased). The password hash
/// is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub login_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active, unverified user
    pub fn new(email: String, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name: None,
            last_name: None,
            is_active: true,
            email_verified: false,
            email_verified_at: None,
            last_login_at: None,
            login_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// First and last name joined by a space, skipping missing parts
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_verified && self.email_verified_at.is_some()
    }

    /// Stamp a successful login
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.login_count += 1;
        self.updated_at = now;
    }
}
