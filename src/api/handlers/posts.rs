//! Post resource

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::json_body;
use crate::api::{errors::ApiError, server::AppState};
use crate::models::{Community, NewPostRequest, Post};

/// POST /posts: members only; replies must stay in the parent's community
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewPostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;
    let req = json_body(payload)?;
    req.validate().map_err(ApiError::Malformed)?;

    let community: Community = state
        .documents
        .get(&req.community_id)
        .await?
        .ok_or(ApiError::NotFound("Community"))?;
    if !community.is_member(&identity_id) {
        return Err(ApiError::Forbidden);
    }

    if let Some(parent_id) = req.parent_id.as_deref() {
        let parent: Post = state
            .documents
            .get(parent_id)
            .await?
            .ok_or(ApiError::NotFound("Post"))?;
        if parent.community_id != community.id {
            return Err(ApiError::Malformed(
                "Parent post belongs to another community".to_string(),
            ));
        }
    }

    let post = Post::new(&identity_id, req);
    state.documents.insert(&post).await?;

    info!(post_id = %post.id, community_id = %post.community_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post: Post = state
        .documents
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("Post"))?;
    Ok(Json(post))
}

/// DELETE /posts/:id: author only
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;

    let post: Post = state
        .documents
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("Post"))?;
    if post.user_id != identity_id {
        return Err(ApiError::Forbidden);
    }

    state.documents.delete::<Post>(&id).await?;

    info!(post_id = %id, "post deleted");
    Ok(Json(json!({ "success": true })))
}
