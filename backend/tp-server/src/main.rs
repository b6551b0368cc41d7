use tp_server::{AppState, AuditLogger, ServerError, ServerErrorResult, build_router, logger};

use tp_auth::{
    AuthService, BruteForceGuard, Clock, PasswordPolicy, RateLimitConfig, RateLimiterSet,
    RateLimiterSetConfig, SystemClock, TokenService, TokenServiceConfig,
};
use tp_config::{AuthConfig, Config, ConfigError, RateLimitPolicy};
use tp_db::{DatabaseOptions, UserRepository};

use std::{net::SocketAddr, sync::Arc, time::Duration};

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ServerErrorResult<()> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let log_dir = Config::config_dir()?.join(&config.logging.dir);
        std::fs::create_dir_all(&log_dir)?;
        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting tp-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let mut database = DatabaseOptions::new(config.database_path()?);
    database.max_connections = config.database.max_connections;
    let pool = tp_db::connect(&database).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let tokens = Arc::new(TokenService::new(
        token_config(&config.auth)?,
        Arc::clone(&clock),
    ));

    let auth = AuthService::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::clone(&tokens),
        PasswordPolicy::new(config.auth.bcrypt_cost),
        Arc::clone(&clock),
    )
    .with_store_timeout(config.auth.store_timeout());

    let limiters = RateLimiterSet::new(
        RateLimiterSetConfig {
            login: limit(config.rate_limit.login),
            register: limit(config.rate_limit.register),
            auth: limit(config.rate_limit.auth),
            general: limit(config.rate_limit.general),
        },
        Arc::clone(&clock),
    );
    let sweepers =
        limiters.spawn_sweepers(Duration::from_secs(config.rate_limit.sweep_interval_secs));

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics {
            message: format!("Failed to install Prometheus recorder: {}", e),
        })?;

    let state = AppState {
        pool,
        auth: Arc::new(auth),
        tokens,
        limiters,
        brute_force: Arc::new(BruteForceGuard::new(Arc::clone(&clock))),
        audit: AuditLogger::new(),
        cookie_secure: config.auth.cookie_secure,
        cors_allowed_origins: config.server.cors_allowed_origins.clone(),
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        metrics: Some(metrics),
    };

    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    for sweeper in sweepers {
        sweeper.abort();
    }
    info!("Graceful shutdown complete");

    Ok(())
}

fn token_config(auth: &AuthConfig) -> ServerErrorResult<TokenServiceConfig> {
    let mut tokens = TokenServiceConfig::new(auth.secret()?);
    tokens.access_ttl = chrono_duration(auth.access_ttl()?)?;
    tokens.refresh_ttl = chrono_duration(auth.refresh_ttl()?)?;
    tokens.issuer = auth.issuer.clone();
    tokens.audience = auth.audience.clone();
    Ok(tokens)
}

fn chrono_duration(ttl: Duration) -> ServerErrorResult<chrono::Duration> {
    chrono::Duration::from_std(ttl)
        .map_err(|e| ConfigError::auth(format!("token TTL out of range: {}", e)).into())
}

fn limit(policy: RateLimitPolicy) -> RateLimitConfig {
    RateLimitConfig::new(policy.max_requests, policy.window_secs)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
        Err(e) => {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
