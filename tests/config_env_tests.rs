//! tests/config_env_tests.rs
//!
//! Environment-driven configuration.
use serial_test::serial;
use socialplace_api::config::AppConfig;
use std::time::Duration;

const KEYS: &[&str] = &[
    "SOCIALPLACE_API_HOST",
    "SOCIALPLACE_API_PORT",
    "SOCIALPLACE_DATABASE_URL",
    "REDIS_HOST",
    "REDIS_PORT",
    "REDIS_PASSWORD",
    "REDIS_DB",
    "SOCIALPLACE_TOKEN_TTL",
    "SOCIALPLACE_BCRYPT_COST",
    "SOCIALPLACE_STORE_TIMEOUT_MS",
    "CORS_ALLOW_ORIGIN",
];

fn clear_env() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.database_url, "sqlite://./socialplace.db");
    assert_eq!(config.redis.url(), "redis://localhost:6379/0");
    assert_eq!(config.auth.token_ttl_secs, 86_400);
    assert_eq!(config.auth.bcrypt_cost, 12);
    assert_eq!(config.store_timeout, Duration::from_millis(2000));
    assert_eq!(config.cors_allow_origin, "*");
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    std::env::set_var("SOCIALPLACE_API_PORT", "9090");
    std::env::set_var("REDIS_HOST", "cache");
    std::env::set_var("REDIS_PASSWORD", "pw");
    std::env::set_var("REDIS_DB", "3");
    std::env::set_var("SOCIALPLACE_TOKEN_TTL", "60");
    std::env::set_var("SOCIALPLACE_STORE_TIMEOUT_MS", "250");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.redis.url(), "redis://:pw@cache:6379/3");
    assert_eq!(config.auth.token_ttl_secs, 60);
    assert_eq!(config.store_timeout, Duration::from_millis(250));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_rejected() {
    clear_env();

    std::env::set_var("SOCIALPLACE_API_PORT", "not-a-port");
    assert!(AppConfig::from_env().is_err());
    clear_env();

    std::env::set_var("SOCIALPLACE_BCRYPT_COST", "3");
    assert!(AppConfig::from_env().is_err());
    clear_env();

    std::env::set_var("SOCIALPLACE_TOKEN_TTL", "0");
    assert!(AppConfig::from_env().is_err());
    clear_env();

    std::env::set_var("SOCIALPLACE_TOKEN_TTL", u64::MAX.to_string());
    assert!(AppConfig::from_env().is_err());
    clear_env();

    std::env::set_var("SOCIALPLACE_STORE_TIMEOUT_MS", "0");
    assert!(AppConfig::from_env().is_err());
    clear_env();
}
