//! Access guard for protected handlers

use axum::http::{header, HeaderMap};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{errors::AuthError, storage::SessionStore};

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively and the token is trimmed.
/// Any other scheme, or an empty token, yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolves bearer tokens to identity ids. Fails closed on store errors.
#[derive(Clone)]
pub struct AccessGuard {
    sessions: Arc<dyn SessionStore>,
}

impl AccessGuard {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Identity id of the caller, or `Unauthorized`
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::Unauthorized)?;

        match self.sessions.resolve(token).await? {
            Some(identity_id) => {
                debug!(identity_id = %identity_id, "request authenticated");
                Ok(identity_id)
            }
            None => {
                warn!("rejected unknown or expired token");
                Err(AuthError::Unauthorized)
            }
        }
    }
}
