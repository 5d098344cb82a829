//! User resource

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::json_body;
use crate::api::{errors::ApiError, server::AppState};
use crate::models::{NewUserRequest, User, UserUpdate, UserView};

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users: Vec<User> = state.documents.list().await?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

/// POST /users: registration
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let req = json_body(payload)?;
    req.validate().map_err(ApiError::Malformed)?;

    // Skips hashing for the common case; the store's unique email rule decides races
    if state
        .documents
        .find_by_email::<User>(&req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::EmailExists);
    }

    let hash = state
        .passwords
        .hash_password_blocking(req.password.clone())
        .await?;
    let user = User::new(req, hash);
    state.documents.insert(&user).await?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// GET /users/me
pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;
    let user: User = state
        .documents
        .get(&identity_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(UserView::from(&user)))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user: User = state
        .documents
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(UserView::from(&user)))
}

/// PUT /users/:id: owner only, allow-listed fields
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;
    if identity_id != id {
        return Err(ApiError::Forbidden);
    }

    let update = json_body(payload)?;
    update.validate().map_err(ApiError::Malformed)?;

    let mut user: User = state
        .documents
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if let Some(email) = update.email.as_deref() {
        if email != user.email {
            let taken = state.documents.find_by_email::<User>(email).await?;
            if taken.is_some() {
                return Err(ApiError::EmailExists);
            }
        }
    }

    let hash = match update.password.clone() {
        Some(password) => Some(state.passwords.hash_password_blocking(password).await?),
        None => None,
    };

    user.apply_update(update, hash);
    if !state.documents.replace(&user).await? {
        return Err(ApiError::NotFound("User"));
    }

    info!(user_id = %user.id, "user updated");
    Ok(Json(UserView::from(&user)))
}

/// DELETE /users/:id: owner only
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity_id = state.guard.authenticate(&headers).await?;
    if identity_id != id {
        return Err(ApiError::Forbidden);
    }

    if !state.documents.delete::<User>(&id).await? {
        return Err(ApiError::NotFound("User"));
    }

    info!(user_id = %id, "user deleted");
    Ok(Json(json!({ "success": true })))
}
