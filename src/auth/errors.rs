//! Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StoreError;

/// Authentication error
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidToken
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,

            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,

            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "InvalidCredentials",
            Self::MissingToken => "MissingToken",
            Self::InvalidToken => "InvalidToken",
            Self::Unauthorized => "Unauthorized",
            Self::ServiceUnavailable(_) => "ServiceUnavailable",
            Self::MalformedRequest(_) => "MalformedRequest",
            Self::InternalError(_) => "InternalError",
        }
    }

    /// Human-readable message; never carries backend details
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::MissingToken => "Authorization token is required".to_string(),
            Self::InvalidToken => "Token is invalid or has expired".to_string(),
            Self::Unauthorized => "Authentication required".to_string(),
            Self::ServiceUnavailable(_) => "Service temporarily unavailable, retry later".to_string(),
            Self::MalformedRequest(detail) => detail.clone(),
            Self::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        if err.is_transient() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::InternalError(err.to_string())
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed on backend");
        }

        let body = Json(json!({
            "error": self.error_code(),
            "message": self.user_message(),
        }));

        (status, body).into_response()
    }
}
