//! Resource-level API errors

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::storage::StoreError;

/// Errors raised by resource handlers
///
/// Authentication and store failures go through [`AuthError`] so their
/// kinds and statuses stay identical across endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Forbidden")]
    Forbidden,

    #[error("Email already registered")]
    EmailExists,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(e) => e.status_code(),
            Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::EmailExists => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.error_code(),
            Self::Malformed(_) => "MalformedRequest",
            Self::NotFound(_) => "NotFound",
            Self::Forbidden => "Forbidden",
            Self::EmailExists => "EmailExists",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => Self::EmailExists,
            other => Self::Auth(AuthError::from(other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(e) => e.into_response(),
            other => {
                let body = Json(json!({
                    "error": other.error_code(),
                    "message": other.to_string(),
                }));
                (other.status_code(), body).into_response()
            }
        }
    }
}
