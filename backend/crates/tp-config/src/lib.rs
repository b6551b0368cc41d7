mod auth_config;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod server_config;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::{RateLimitConfig, RateLimitPolicy};
pub use server_config::ServerConfig;

const CONFIG_DIR_ENV: &str = "TP_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".trecplans";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

const DEFAULT_DATABASE_FILENAME: &str = "trecplans.db";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const DEFAULT_ACCESS_TOKEN_TTL: &str = "24h";
const DEFAULT_REFRESH_TOKEN_TTL: &str = "168h";
const DEFAULT_ISSUER: &str = "Trecplans";
const DEFAULT_AUDIENCE: &str = "trecplans";
const DEFAULT_BCRYPT_COST: u32 = 12;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
