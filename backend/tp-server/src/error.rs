use thiserror::Error;

/// Startup failures; everything here ends the process
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] tp_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] tp_db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Metrics error: {message}")]
    Metrics { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
