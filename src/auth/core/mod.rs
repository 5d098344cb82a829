//! Core credential and token logic

pub mod password_service;
pub mod token_service;

pub use password_service::{check_password_length, PasswordService, MAX_PASSWORD_BYTES};
pub use token_service::TokenService;
