//! Status and statistics

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::api::{errors::ApiError, server::AppState};
use crate::models::{Community, Post, User};

/// GET /status: per-store health
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let (documents, sessions) = tokio::join!(state.documents.ping(), state.sessions.ping());

    if let Err(e) = &documents {
        warn!(error = %e, "document store health check failed");
    }
    if let Err(e) = &sessions {
        warn!(error = %e, "session store health check failed");
    }

    Json(json!({
        "api_status": "OK",
        "document_store": documents.is_ok(),
        "session_store": sessions.is_ok(),
    }))
}

/// GET /stats: document counts per collection
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.documents.count::<User>().await?;
    let communities = state.documents.count::<Community>().await?;
    let posts = state.documents.count::<Post>().await?;

    Ok(Json(json!({
        "users": users,
        "communities": communities,
        "posts": posts,
    })))
}
