use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::auth::{extractors::CurrentUser, ROLE_ADMIN};
use crate::error::{conflict_on_unique, ApiError};
use crate::response::MessageResponse;
use crate::state::AppState;
use crate::validate::require_len;

use super::repo::{self, Status};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub name: String,
}

pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/statuses", get(get_statuses).post(add_status))
        .route(
            "/statuses/:status_id",
            get(get_status).put(edit_status).delete(delete_status),
        )
}

#[instrument(skip(state, current, payload))]
pub async fn add_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    require_len("name", &payload.name, 50)?;

    let created = repo::create(&state.db, &payload.name).await?;
    if created.is_none() {
        return Err(ApiError::conflict("Status already exists!"));
    }

    info!(name = %payload.name, "status created");
    Ok(Json(MessageResponse::new(
        "Status has been added successfully!",
    )))
}

#[instrument(skip(state))]
pub async fn get_statuses(State(state): State<AppState>) -> Result<Json<Vec<Status>>, ApiError> {
    let statuses = repo::list(&state.db).await?;
    Ok(Json(statuses))
}

#[instrument(skip(state))]
pub async fn get_status(
    State(state): State<AppState>,
    Path(status_id): Path<i32>,
) -> Result<Json<Status>, ApiError> {
    let status = repo::find(&state.db, status_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Status is not found"))?;
    Ok(Json(status))
}

#[instrument(skip(state, current, payload))]
pub async fn edit_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(status_id): Path<i32>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    require_len("name", &payload.name, 50)?;

    let updated = repo::rename(&state.db, status_id, &payload.name)
        .await
        .map_err(|e| conflict_on_unique(e, "Status already exists!"))?;
    if updated == 0 {
        return Err(ApiError::not_found("Status is not found"));
    }

    info!(status_id, "status updated");
    Ok(Json(MessageResponse::new(
        "Status has been updated successfully!",
    )))
}

#[instrument(skip(state, current))]
pub async fn delete_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(status_id): Path<i32>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    current.require_role(&[ROLE_ADMIN])?;

    let deleted = repo::delete(&state.db, status_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Status is not found"));
    }

    info!(status_id, "status deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Status has been deleted successfully!")),
    ))
}
