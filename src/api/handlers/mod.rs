//! Resource handlers

pub mod communities;
pub mod index;
pub mod posts;
pub mod users;

use axum::{extract::rejection::JsonRejection, Json};

use crate::api::errors::ApiError;

/// Unwrap a JSON body, turning any rejection into a 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload?;
    Ok(body)
}
