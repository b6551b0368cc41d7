use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR_NAME,
    DatabaseConfig, LoggingConfig, RateLimitConfig, ServerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the config directory.
    ///
    /// Loading order:
    /// 1. TP_CONFIG_DIR env var, else ./.trecplans/
    /// 2. Auto-create the directory if missing
    /// 3. Parse config.toml if it exists, else defaults
    /// 4. Apply TP_* environment overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: TP_CONFIG_DIR env var > ./.trecplans/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all sections. Call after load() to fail at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }

    /// Absolute path to the SQLite file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (timeout {}s, {} CORS origins)",
            self.server.host,
            self.server.port,
            self.server.request_timeout_secs,
            self.server.cors_allowed_origins.len()
        );
        info!(
            "  database: {} (max {} connections)",
            self.database.path, self.database.max_connections
        );
        info!(
            "  auth: secret {}, access={}, refresh={}, bcrypt_cost={}, secure_cookie={}",
            if self.auth.jwt_secret.is_some() {
                "set"
            } else {
                "missing"
            },
            self.auth.access_token_ttl,
            self.auth.refresh_token_ttl,
            self.auth.bcrypt_cost,
            self.auth.cookie_secure
        );
        info!(
            "  rate_limit: login={}/{}s, register={}/{}s, auth={}/{}s, general={}/{}s",
            self.rate_limit.login.max_requests,
            self.rate_limit.login.window_secs,
            self.rate_limit.register.max_requests,
            self.rate_limit.register.window_secs,
            self.rate_limit.auth.max_requests,
            self.rate_limit.auth.window_secs,
            self.rate_limit.general.max_requests,
            self.rate_limit.general.window_secs
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("TP_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("TP_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "TP_SERVER_REQUEST_TIMEOUT_SECS",
            &mut self.server.request_timeout_secs,
        );
        Self::apply_env_list(
            "TP_SERVER_CORS_ALLOWED_ORIGINS",
            &mut self.server.cors_allowed_origins,
        );

        // Database
        Self::apply_env_string("TP_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse(
            "TP_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );

        // Auth
        Self::apply_env_option_string("TP_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_string("TP_AUTH_ACCESS_TOKEN_TTL", &mut self.auth.access_token_ttl);
        Self::apply_env_string("TP_AUTH_REFRESH_TOKEN_TTL", &mut self.auth.refresh_token_ttl);
        Self::apply_env_string("TP_AUTH_ISSUER", &mut self.auth.issuer);
        Self::apply_env_string("TP_AUTH_AUDIENCE", &mut self.auth.audience);
        Self::apply_env_parse("TP_AUTH_BCRYPT_COST", &mut self.auth.bcrypt_cost);
        Self::apply_env_parse(
            "TP_AUTH_STORE_TIMEOUT_SECS",
            &mut self.auth.store_timeout_secs,
        );
        Self::apply_env_bool("TP_AUTH_COOKIE_SECURE", &mut self.auth.cookie_secure);

        // Rate limit
        Self::apply_env_parse(
            "TP_RATE_LIMIT_LOGIN_MAX_REQUESTS",
            &mut self.rate_limit.login.max_requests,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_LOGIN_WINDOW_SECS",
            &mut self.rate_limit.login.window_secs,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_REGISTER_MAX_REQUESTS",
            &mut self.rate_limit.register.max_requests,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_REGISTER_WINDOW_SECS",
            &mut self.rate_limit.register.window_secs,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_AUTH_MAX_REQUESTS",
            &mut self.rate_limit.auth.max_requests,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_AUTH_WINDOW_SECS",
            &mut self.rate_limit.auth.window_secs,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_GENERAL_MAX_REQUESTS",
            &mut self.rate_limit.general.max_requests,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_GENERAL_WINDOW_SECS",
            &mut self.rate_limit.general.window_secs,
        );
        Self::apply_env_parse(
            "TP_RATE_LIMIT_SWEEP_INTERVAL_SECS",
            &mut self.rate_limit.sweep_interval_secs,
        );

        // Logging
        Self::apply_env_parse("TP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("TP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("TP_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("TP_LOG_DIR", &mut self.logging.dir);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }

    /// Helper: comma-separated list, blanks dropped
    fn apply_env_list(var_name: &str, target: &mut Vec<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect();
        }
    }
}
