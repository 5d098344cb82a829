use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use std::time::Duration;

use crate::auth::AuthConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./socialplace.db";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

/// Read `key` and parse it, falling back to `default` when unset or empty.
/// A set but unparsable value is an error.
pub fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", key, e)),
        _ => Ok(default),
    }
}

/// Redis connection settings
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<SecretString>,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Result<Self> {
        let password = std::env::var("REDIS_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .map(SecretString::new);

        Ok(Self {
            host: env_or("REDIS_HOST", "localhost".to_string())?,
            port: env_or("REDIS_PORT", 6379)?,
            password,
            db: env_or("REDIS_DB", 0)?,
        })
    }

    /// Connection URL. Contains the password; never log it.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password.expose_secret(),
                self.host,
                self.port,
                self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    /// Per-call bound on document/session store round-trips
    pub store_timeout: Duration,
    pub cors_allow_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis: RedisConfig::default(),
            auth: AuthConfig::default(),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            cors_allow_origin: "*".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: env_or("SOCIALPLACE_API_HOST", DEFAULT_HOST.to_string())?,
            port: env_or("SOCIALPLACE_API_PORT", DEFAULT_PORT)?,
            database_url: env_or("SOCIALPLACE_DATABASE_URL", DEFAULT_DATABASE_URL.to_string())?,
            redis: RedisConfig::from_env().context("redis configuration")?,
            auth: AuthConfig::from_env().context("auth configuration")?,
            store_timeout: Duration::from_millis(env_or(
                "SOCIALPLACE_STORE_TIMEOUT_MS",
                DEFAULT_STORE_TIMEOUT_MS,
            )?),
            cors_allow_origin: env_or("CORS_ALLOW_ORIGIN", "*".to_string())?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.auth.validate().map_err(anyhow::Error::msg)?;
        if self.store_timeout.is_zero() {
            anyhow::bail!("SOCIALPLACE_STORE_TIMEOUT_MS must be greater than zero");
        }
        if self.database_url.is_empty() {
            anyhow::bail!("SOCIALPLACE_DATABASE_URL must not be empty");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
