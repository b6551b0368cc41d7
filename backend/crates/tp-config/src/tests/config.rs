use crate::Config;
use crate::tests::{EnvGuard, TEST_SECRET, setup_config_dir, write_config};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _dir = setup_config_dir();
    let _secret = EnvGuard::remove("TP_AUTH_JWT_SECRET");

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
    assert_that!(config.server.host.as_str(), eq(crate::DEFAULT_HOST));
    assert_that!(config.database.path.as_str(), eq("trecplans.db"));
    assert_that!(config.auth.bcrypt_cost, eq(12));
    assert_that!(config.rate_limit.login.max_requests, eq(5));
    assert_that!(config.rate_limit.login.window_secs, eq(900));
    assert!(config.auth.jwt_secret.is_none());
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_directory_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("nested").join("config");
    let _dir = EnvGuard::set("TP_CONFIG_DIR", nested.to_str().unwrap());

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    assert!(nested.is_dir());
}

#[test]
#[serial]
fn given_defaults_without_secret_when_validate_then_error() {
    // Given
    let _dir = setup_config_dir();
    let _secret = EnvGuard::remove("TP_AUTH_JWT_SECRET");
    let config = Config::load().unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_defaults_with_secret_env_when_validate_then_ok() {
    // Given
    let _dir = setup_config_dir();
    let _secret = EnvGuard::set("TP_AUTH_JWT_SECRET", TEST_SECRET);
    let config = Config::load().unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        &temp,
        r#"
            [server]
            port = 9000
            cors_allowed_origins = ["https://app.example.com"]

            [auth]
            access_token_ttl = "15m"

            [rate_limit.login]
            max_requests = 10
            window_secs = 60
        "#,
    );

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(9000));
    assert_eq!(
        config.server.cors_allowed_origins,
        vec!["https://app.example.com".to_string()]
    );
    assert_that!(config.auth.access_token_ttl.as_str(), eq("15m"));
    assert_that!(config.rate_limit.login.max_requests, eq(10));
    assert_that!(config.rate_limit.register.max_requests, eq(3));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "[server]\nport = 9000\n");
    let _port = EnvGuard::set("TP_SERVER_PORT", "9100");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(9100));
}

#[test]
#[serial]
fn given_cors_env_list_when_load_then_split_and_trimmed() {
    // Given
    let _dir = setup_config_dir();
    let _cors = EnvGuard::set(
        "TP_SERVER_CORS_ALLOWED_ORIGINS",
        "https://a.example.com, https://b.example.com,,",
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(
        config.server.cors_allowed_origins,
        vec![
            "https://a.example.com".to_string(),
            "https://b.example.com".to_string()
        ]
    );
}

#[test]
#[serial]
fn given_unparseable_env_number_when_load_then_keeps_default() {
    // Given
    let _dir = setup_config_dir();
    let _port = EnvGuard::set("TP_SERVER_PORT", "not-a-port");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
}

#[test]
#[serial]
fn given_log_level_env_when_load_then_level_applied() {
    // Given
    let _dir = setup_config_dir();
    let _level = EnvGuard::set("TP_LOG_LEVEL", "debug");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
}

#[test]
#[serial]
fn given_database_path_when_resolved_then_joined_to_config_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let config = Config::load().unwrap();

    // When
    let path = config.database_path().unwrap();

    // Then
    assert_eq!(path, temp.path().join("trecplans.db"));
}

// =========================================================================
// Error Tests
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "[server\nport = ");

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
    assert_that!(
        result.unwrap_err().to_string(),
        contains_substring("TOML parse error")
    );
}

#[test]
#[serial]
fn given_database_path_with_parent_dir_when_validate_then_error() {
    // Given
    let _dir = setup_config_dir();
    let _secret = EnvGuard::set("TP_AUTH_JWT_SECRET", TEST_SECRET);
    let _db = EnvGuard::set("TP_DATABASE_PATH", "../escape.db");
    let config = Config::load().unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    assert_that!(
        result.unwrap_err().to_string(),
        contains_substring("database.path")
    );
}

#[test]
fn given_host_and_port_when_bind_addr_then_joined() {
    // Given
    let mut config = Config::default();
    config.server.host = "0.0.0.0".to_string();
    config.server.port = 3000;

    // When
    let addr = config.bind_addr();

    // Then
    assert_that!(addr.as_str(), eq("0.0.0.0:3000"));
}
