//! Security audit trail.
//!
//! Each event is serialized to one JSON line on the `audit` log target, so a
//! log backend can route it separately from application logs. Password values
//! never enter an event.

use crate::client_info::ClientInfo;

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const AUDIT_TARGET: &str = "audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Login,
    LoginFailed,
    Logout,
    Register,
    RegisterFailed,
    PasswordChange,
    ProfileUpdate,
    TokenRefresh,
    AccountLock,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub event_type: AuditEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub ip: String,
    pub user_agent: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType, client: &ClientInfo, success: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            user_id: None,
            email: None,
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            success,
            reason: None,
            metadata: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user(mut self, user_id: Uuid, email: &str) -> Self {
        self.user_id = Some(user_id);
        self.email = Some(email.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Stateless sink for [`AuditEvent`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn log(&self, event: &AuditEvent) {
        match serde_json::to_string(event) {
            Ok(json) => info!(target: AUDIT_TARGET, "{}", json),
            Err(e) => error!(
                "Failed to serialize audit event {:?}: {}",
                event.event_type, e
            ),
        }
    }

    pub fn login_success(&self, client: &ClientInfo, user_id: Uuid, email: &str) {
        self.log(&AuditEvent::new(AuditEventType::Login, client, true).user(user_id, email));
    }

    pub fn login_failed(&self, client: &ClientInfo, email: &str, reason: &str) {
        self.log(
            &AuditEvent::new(AuditEventType::LoginFailed, client, false)
                .email(email)
                .reason(reason),
        );
    }

    pub fn logout(&self, client: &ClientInfo, user: Option<(Uuid, &str)>) {
        let event = AuditEvent::new(AuditEventType::Logout, client, true);
        let event = match user {
            Some((user_id, email)) => event.user(user_id, email),
            None => event,
        };
        self.log(&event);
    }

    pub fn registration(&self, client: &ClientInfo, user_id: Uuid, email: &str) {
        self.log(&AuditEvent::new(AuditEventType::Register, client, true).user(user_id, email));
    }

    pub fn registration_failed(&self, client: &ClientInfo, email: &str, reason: &str) {
        self.log(
            &AuditEvent::new(AuditEventType::RegisterFailed, client, false)
                .email(email)
                .reason(reason),
        );
    }

    pub fn password_change(&self, client: &ClientInfo, user_id: Uuid, email: &str, success: bool) {
        self.log(
            &AuditEvent::new(AuditEventType::PasswordChange, client, success).user(user_id, email),
        );
    }

    /// `changes` lists the field names that were updated, never their values
    pub fn profile_update(&self, client: &ClientInfo, user_id: Uuid, email: &str, changes: &[&str]) {
        self.log(
            &AuditEvent::new(AuditEventType::ProfileUpdate, client, true)
                .user(user_id, email)
                .metadata(serde_json::json!({ "fields": changes })),
        );
    }

    pub fn token_refresh(&self, client: &ClientInfo, user_id: Uuid, email: &str) {
        self.log(
            &AuditEvent::new(AuditEventType::TokenRefresh, client, true).user(user_id, email),
        );
    }

    pub fn account_lock(&self, client: &ClientInfo, client_key: &str, failures: u32) {
        self.log(
            &AuditEvent::new(AuditEventType::AccountLock, client, false)
                .reason("too many failed login attempts")
                .metadata(serde_json::json!({
                    "client_key": client_key,
                    "failed_attempts": failures,
                })),
        );
    }
}
