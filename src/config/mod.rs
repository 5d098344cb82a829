//! Application configuration

pub mod env_config;

pub use env_config::{env_or, AppConfig, RedisConfig};
