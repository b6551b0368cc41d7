use crate::{StoreResult, User};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persistence contract the auth core depends on.
///
/// Implementations must enforce email uniqueness in `create` (returning
/// `StoreError::Duplicate`) so that concurrent registrations of the same
/// address cannot both succeed.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Look up by an already-normalized email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create(&self, user: &User) -> StoreResult<()>;

    /// Overwrite every mutable column of an existing user
    async fn save(&self, user: &User) -> StoreResult<()>;

    /// Stamp a successful login in place. Touches only `last_login_at`,
    /// `login_count` and `updated_at`, so a concurrent deactivation or
    /// password change is never overwritten.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;
}
