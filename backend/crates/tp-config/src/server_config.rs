use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CORS_ORIGINS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, MIN_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single request, store calls included
    pub request_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        // Port 0 means "auto-assign" - OS picks an available port.
        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::server(format!(
                "server.port must be 0 (auto) or >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::server(
                "server.request_timeout_secs must be at least 1",
            ));
        }

        if let Some(origin) = self
            .cors_allowed_origins
            .iter()
            .find(|origin| !origin.starts_with("http://") && !origin.starts_with("https://"))
        {
            return Err(ConfigError::server(format!(
                "server.cors_allowed_origins entries must be http(s) origins, got '{}'",
                origin
            )));
        }

        Ok(())
    }
}
