// src/lib.rs

pub mod api;
pub mod config;
pub mod models;
pub mod storage;

// Authentication module
pub mod auth;

pub use api::{ApiServer, AppState};
pub use config::AppConfig;
