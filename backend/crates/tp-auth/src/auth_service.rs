use crate::{
    AuthError, AuthServiceError, Claims, Clock, IssuedToken, LoginCredentials, PasswordChange,
    PasswordPolicy, ProfileUpdate, Registration, TokenService,
    auth_service_error::Result as AuthServiceResult,
    email::{is_valid_email, normalize_email},
    requests::MAX_NAME_LENGTH,
};

use tp_core::{StoreError, StoreResult, User, UserStore};

use std::{future::Future, panic::Location, sync::Arc, time::Duration as StdDuration};

use error_location::ErrorLocation;
use log::{error, info, warn};
use metrics::counter;
use uuid::Uuid;

pub const DEFAULT_STORE_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Account use cases: register, login, refresh, password change, logout and
/// profile maintenance.
///
/// Every store call is bounded by `store_timeout`. Dropping a returned future
/// drops the in-flight store call with it.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    policy: PasswordPolicy,
    clock: Arc<dyn Clock>,
    store_timeout: StdDuration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        policy: PasswordPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            tokens,
            policy,
            clock,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: StdDuration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    pub async fn register(&self, request: Registration) -> AuthServiceResult<User> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            warn!("Registration validation failed for '{}': invalid email", email);
            return Err(AuthServiceError::validation("email", "Invalid email format"));
        }
        if request.password != request.password_confirm {
            return Err(AuthServiceError::validation(
                "password_confirm",
                "Password confirmation does not match",
            ));
        }
        let first_name = clean_name("first_name", request.first_name)?;
        let last_name = clean_name("last_name", request.last_name)?;

        let strength = self.policy.validate_strength(&request.password);
        if !strength.ok {
            warn!(
                "Weak password provided for '{}': {} rule(s) failed",
                email,
                strength.reasons.len()
            );
            return Err(AuthServiceError::WeakPassword {
                reasons: strength.reasons,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let existing = self
            .store_call("find_by_email", self.store.find_by_email(&email))
            .await?;
        if existing.is_some() {
            warn!("Registration attempt with existing email '{}'", email);
            return Err(AuthServiceError::UserAlreadyExists {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let password_hash = self.hash(request.password).await?;

        let mut user = User::new(email, password_hash, self.clock.now());
        user.first_name = first_name;
        user.last_name = last_name;

        match self.bounded("create", self.store.create(&user)).await? {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => {
                warn!("Concurrent registration lost the race for '{}'", user.email);
                return Err(AuthServiceError::UserAlreadyExists {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(store_failure("create", e)),
        }

        info!("User registered: {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Authenticate credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, credentials: LoginCredentials) -> AuthServiceResult<User> {
        let email = normalize_email(&credentials.email);
        if !is_valid_email(&email) {
            return Err(AuthServiceError::validation("email", "Invalid email format"));
        }
        if credentials.password.is_empty() {
            return Err(AuthServiceError::validation("password", "Password is required"));
        }

        let Some(mut user) = self
            .store_call("find_by_email", self.store.find_by_email(&email))
            .await?
        else {
            warn!("Login attempt with unknown email '{}'", email);
            return Err(AuthServiceError::invalid_credentials());
        };

        if !user.is_active {
            warn!("Login attempt on inactive account {}", user.id);
            return Err(AuthServiceError::UserInactive {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Err(e) = self.verify(credentials.password, user.password_hash.clone()).await? {
            match e {
                AuthError::PasswordMismatch { .. } => {
                    warn!("Login attempt with invalid password for {}", user.id)
                }
                other => error!("Stored hash for {} could not be checked: {}", user.id, other),
            }
            return Err(AuthServiceError::invalid_credentials());
        }

        let now = self.clock.now();
        match self
            .bounded("record_login", self.store.record_login(user.id, now))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.login_metadata_failed(&user, &e.to_string()),
            Err(e) => self.login_metadata_failed(&user, &e.to_string()),
        }

        user.record_login(now);
        info!("User logged in: {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Exchange a refresh token for a new access token, then re-read the
    /// account so a deleted or deactivated user cannot keep refreshing.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> AuthServiceResult<(IssuedToken, User)> {
        let issued = self.tokens.refresh_access_token(refresh_token)?;

        let user = self
            .store_call("find_by_id", self.store.find_by_id(issued.claims.user_id))
            .await?
            .ok_or_else(AuthServiceError::user_not_found)?;

        if !user.is_active {
            warn!("Token refresh for inactive account {}", user.id);
            return Err(AuthServiceError::UserInactive {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Access token refreshed for {}", user.id);
        Ok((issued, user))
    }

    /// Existing tokens stay valid until they expire
    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: PasswordChange,
    ) -> AuthServiceResult<()> {
        if request.current_password.is_empty() {
            return Err(AuthServiceError::validation(
                "current_password",
                "Current password is required",
            ));
        }
        if request.new_password != request.password_confirm {
            return Err(AuthServiceError::validation(
                "password_confirm",
                "Password confirmation does not match",
            ));
        }

        let strength = self.policy.validate_strength(&request.new_password);
        if !strength.ok {
            return Err(AuthServiceError::WeakPassword {
                reasons: strength.reasons,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut user = self.get_user(user_id).await?;

        if self
            .verify(request.current_password, user.password_hash.clone())
            .await?
            .is_err()
        {
            warn!("Password change with wrong current password for {}", user_id);
            return Err(AuthServiceError::invalid_credentials());
        }

        user.password_hash = self.hash(request.new_password).await?;
        user.updated_at = self.clock.now();
        self.store_call("save", self.store.save(&user)).await?;

        info!("Password changed for {}", user_id);
        Ok(())
    }

    /// Nothing to revoke server-side; the caller clears its refresh storage
    pub fn logout(&self, user_id: Option<Uuid>) {
        match user_id {
            Some(id) => info!("User logged out: {}", id),
            None => info!("Anonymous logout"),
        }
    }

    /// Active users only
    pub async fn get_user(&self, user_id: Uuid) -> AuthServiceResult<User> {
        self.store_call("find_by_id", self.store.find_by_id(user_id))
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(AuthServiceError::user_not_found)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> AuthServiceResult<User> {
        let first_name = clean_name("first_name", update.first_name)?;
        let last_name = clean_name("last_name", update.last_name)?;

        let mut user = self.get_user(user_id).await?;
        if first_name.is_some() {
            user.first_name = first_name;
        }
        if last_name.is_some() {
            user.last_name = last_name;
        }
        user.updated_at = self.clock.now();

        self.store_call("save", self.store.save(&user)).await?;

        info!("Profile updated for {}", user_id);
        Ok(user)
    }

    pub async fn deactivate_user(&self, user_id: Uuid) -> AuthServiceResult<()> {
        let mut user = self
            .store_call("find_by_id", self.store.find_by_id(user_id))
            .await?
            .ok_or_else(AuthServiceError::user_not_found)?;

        user.is_active = false;
        user.updated_at = self.clock.now();
        self.store_call("save", self.store.save(&user)).await?;

        info!("User deactivated: {}", user_id);
        Ok(())
    }

    pub async fn verify_email(&self, user_id: Uuid) -> AuthServiceResult<()> {
        let mut user = self
            .store_call("find_by_id", self.store.find_by_id(user_id))
            .await?
            .ok_or_else(AuthServiceError::user_not_found)?;

        let now = self.clock.now();
        user.email_verified = true;
        user.email_verified_at = Some(now);
        user.updated_at = now;
        self.store_call("save", self.store.save(&user)).await?;

        info!("Email verified for {}", user_id);
        Ok(())
    }

    pub fn validate_access_token(&self, token: &str) -> AuthServiceResult<Claims> {
        Ok(self.tokens.validate_access_token(token)?)
    }

    pub fn validate_refresh_token(&self, token: &str) -> AuthServiceResult<Claims> {
        Ok(self.tokens.validate_refresh_token(token)?)
    }

    /// Run a store call under the timeout, keeping the store's own error
    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        call: F,
    ) -> AuthServiceResult<StoreResult<T>>
    where
        F: Future<Output = StoreResult<T>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                error!("User store call '{}' timed out", operation);
                AuthServiceError::Timeout {
                    operation,
                    location: ErrorLocation::from(Location::caller()),
                }
            })
    }

    /// Run a store call under the timeout and fold store errors into `Internal`
    async fn store_call<T, F>(&self, operation: &'static str, call: F) -> AuthServiceResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        self.bounded(operation, call)
            .await?
            .map_err(|e| store_failure(operation, e))
    }

    async fn hash(&self, password: String) -> AuthServiceResult<String> {
        let policy = self.policy;
        tokio::task::spawn_blocking(move || policy.hash_password(&password))
            .await
            .map_err(|e| AuthServiceError::internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                AuthServiceError::internal("failed to hash password")
            })
    }

    /// Outer error is infrastructure; inner is the verification outcome
    async fn verify(
        &self,
        password: String,
        hash: String,
    ) -> AuthServiceResult<Result<(), AuthError>> {
        let policy = self.policy;
        tokio::task::spawn_blocking(move || policy.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthServiceError::internal(format!("verification task failed: {}", e)))
    }

    fn login_metadata_failed(&self, user: &User, reason: &str) {
        warn!("Failed to update login info for {}: {}", user.id, reason);
        counter!("tp_auth.login_metadata_update_failures").increment(1);
    }
}

#[track_caller]
fn store_failure(operation: &'static str, e: StoreError) -> AuthServiceError {
    error!("User store '{}' failed: {}", operation, e);
    AuthServiceError::internal("user store error")
}

/// Trim an optional name; blank means "not provided"
#[track_caller]
fn clean_name(field: &str, name: Option<String>) -> AuthServiceResult<Option<String>> {
    let Some(name) = name else {
        return Ok(None);
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AuthServiceError::validation(
            field,
            format!("{} must be at most {} characters", field, MAX_NAME_LENGTH),
        ));
    }
    Ok(Some(trimmed.to_string()))
}
