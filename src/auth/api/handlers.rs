//! Login and logout handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::auth::{
    errors::AuthError,
    guard::bearer_token,
    session_manager::SessionManager,
    types::{LoginRequest, TokenResponse},
};

/// POST /auth/login
pub async fn login(
    State(manager): State<Arc<SessionManager>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Json(req) = payload.map_err(|e| AuthError::MalformedRequest(e.body_text()))?;
    info!("API: login request");

    let issued = manager.login(&req.email, &req.password).await?;
    Ok(Json(TokenResponse::from(issued)))
}

/// DELETE /auth/logout
pub async fn logout(
    State(manager): State<Arc<SessionManager>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AuthError> {
    info!("API: logout request");

    manager.logout(bearer_token(&headers)).await?;
    Ok(Json(json!({ "success": true })))
}
