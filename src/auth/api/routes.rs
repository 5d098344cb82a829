//! Authentication routes

use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use crate::auth::session_manager::SessionManager;

/// Routes relative to the API prefix
pub fn create_auth_routes(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", delete(handlers::logout))
        .with_state(manager)
}
