//! SQLite-backed user store.
//!
//! Timestamps are stored as Unix seconds. Email uniqueness is enforced by the
//! `UNIQUE COLLATE NOCASE` constraint, so two concurrent `create` calls for the
//! same address cannot both commit.

use crate::{DbError, Result as DbErrorResult};

use tp_core::{StoreResult, User, UserStore};

use std::panic::Location;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, is_active, \
     email_verified, email_verified_at, last_login_at, login_count, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> DbErrorResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
                INSERT INTO users (
                    id, email, password_hash, first_name, last_name, is_active,
                    email_verified, email_verified_at, last_login_at, login_count,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.email_verified_at.map(|dt| dt.timestamp()))
        .bind(user.last_login_at.map(|dt| dt.timestamp()))
        .bind(user.login_count)
        .bind(user.created_at.timestamp())
        .bind(user.updated_at.timestamp())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(DbError::DuplicateEmail {
                    email: user.email.clone(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    /// Overwrites every mutable column. Saving an unknown id is an error.
    pub async fn update(&self, user: &User) -> DbErrorResult<()> {
        let result = sqlx::query(
            r#"
                UPDATE users
                SET email = ?, password_hash = ?, first_name = ?, last_name = ?,
                    is_active = ?, email_verified = ?, email_verified_at = ?,
                    last_login_at = ?, login_count = ?, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.email_verified_at.map(|dt| dt.timestamp()))
        .bind(user.last_login_at.map(|dt| dt.timestamp()))
        .bind(user.login_count)
        .bind(user.updated_at.timestamp())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(DbError::DuplicateEmail {
                    email: user.email.clone(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if result.rows_affected() == 0 {
            return Err(DbError::InvalidRow {
                message: format!("user {} does not exist", user.id),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Single-statement increment; leaves every other column alone
    pub async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> DbErrorResult<()> {
        let result = sqlx::query(
            r#"
                UPDATE users
                SET last_login_at = ?, login_count = login_count + 1, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(at.timestamp())
        .bind(at.timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::InvalidRow {
                message: format!("user {} does not exist", id),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepository::find_by_email(self, email).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(UserRepository::find_by_id(self, id).await?)
    }

    async fn create(&self, user: &User) -> StoreResult<()> {
        Ok(UserRepository::create(self, user).await?)
    }

    async fn save(&self, user: &User) -> StoreResult<()> {
        Ok(self.update(user).await?)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        Ok(UserRepository::record_login(self, id, at).await?)
    }
}

fn user_from_row(row: &SqliteRow) -> DbErrorResult<User> {
    let id: String = row.try_get("id")?;

    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| DbError::InvalidRow {
            message: format!("Invalid UUID in users.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        is_active: row.try_get("is_active")?,
        email_verified: row.try_get("email_verified")?,
        email_verified_at: optional_timestamp(row.try_get("email_verified_at")?, "email_verified_at")?,
        last_login_at: optional_timestamp(row.try_get("last_login_at")?, "last_login_at")?,
        login_count: row.try_get("login_count")?,
        created_at: timestamp(row.try_get("created_at")?, "created_at")?,
        updated_at: timestamp(row.try_get("updated_at")?, "updated_at")?,
    })
}

#[track_caller]
fn timestamp(secs: i64, column: &str) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| DbError::InvalidRow {
        message: format!("Invalid timestamp in users.{}", column),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn optional_timestamp(secs: Option<i64>, column: &str) -> DbErrorResult<Option<DateTime<Utc>>> {
    secs.map(|s| timestamp(s, column)).transpose()
}
