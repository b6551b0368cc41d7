use crate::Result as DbErrorResult;

use std::{path::PathBuf, time::Duration};

use log::info;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl DatabaseOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 10,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Open (creating if needed) the SQLite file and bring its schema up to date
pub async fn connect(options: &DatabaseOptions) -> DbErrorResult<SqlitePool> {
    info!("Connecting to database: {}", options.path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&options.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(options.busy_timeout),
        )
        .await?;

    info!("Database connection established");
    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> DbErrorResult<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations complete");
    Ok(())
}
