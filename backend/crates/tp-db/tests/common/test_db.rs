use tp_core::User;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    tp_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A user whose timestamps survive the seconds-resolution round trip
pub fn test_user(email: &str) -> User {
    let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
    let mut user = User::new(email.to_string(), "$2b$04$not-a-real-hash".to_string(), now);
    user.first_name = Some("Alice".to_string());
    user
}
