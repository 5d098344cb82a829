//! Community resource

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use super::json_body;
use crate::api::{errors::ApiError, server::AppState};
use crate::models::{Community, NewCommunityRequest, User};

/// POST /communities: the creator becomes the first member
pub async fn create_community(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewCommunityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Community>), ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;
    let req = json_body(payload)?;
    req.validate().map_err(ApiError::Malformed)?;

    let community = Community::new(req.name, &identity_id);
    state.documents.insert(&community).await?;
    record_membership(&state, &identity_id, &community.id).await?;

    info!(community_id = %community.id, "community created");
    Ok((StatusCode::CREATED, Json(community)))
}

/// GET /communities/:id
pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Community>, ApiError> {
    let community: Community = state
        .documents
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("Community"))?;
    Ok(Json(community))
}

/// POST /communities/:id/join: idempotent
pub async fn join_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Community>, ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;

    let mut community: Community = state
        .documents
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("Community"))?;

    if community.add_member(&identity_id) {
        state.documents.replace(&community).await?;
        info!(community_id = %community.id, user_id = %identity_id, "member joined");
    }
    record_membership(&state, &identity_id, &community.id).await?;

    Ok(Json(community))
}

/// Mirror membership on the user document
async fn record_membership(
    state: &AppState,
    user_id: &str,
    community_id: &str,
) -> Result<(), ApiError> {
    let mut user: User = state
        .documents
        .get(user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if user.join_community(community_id) {
        state.documents.replace(&user).await?;
    }
    Ok(())
}
