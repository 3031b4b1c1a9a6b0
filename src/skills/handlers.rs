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

use super::repo::{self, Skill};

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub title: String,
}

pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(get_skills).post(add_skill))
        .route(
            "/skills/:skill_id",
            get(get_skill).put(edit_skill).delete(delete_skill),
        )
}

#[instrument(skip(state, current, payload))]
pub async fn add_skill(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<SkillRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    require_len("title", &payload.title, 50)?;

    let created = repo::create(&state.db, &payload.title).await?;
    if created.is_none() {
        return Err(ApiError::conflict("Skill already exists!"));
    }

    info!(title = %payload.title, "skill created");
    Ok(Json(MessageResponse::new(
        "Skill has been added successfully!",
    )))
}

#[instrument(skip(state))]
pub async fn get_skills(State(state): State<AppState>) -> Result<Json<Vec<Skill>>, ApiError> {
    let skills = repo::list(&state.db).await?;
    Ok(Json(skills))
}

#[instrument(skip(state))]
pub async fn get_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<i32>,
) -> Result<Json<Skill>, ApiError> {
    let skill = repo::find(&state.db, skill_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    Ok(Json(skill))
}

#[instrument(skip(state, current, payload))]
pub async fn edit_skill(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(skill_id): Path<i32>,
    Json(payload): Json<SkillRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    require_len("title", &payload.title, 50)?;

    let updated = repo::rename(&state.db, skill_id, &payload.title)
        .await
        .map_err(|e| conflict_on_unique(e, "Skill already exists!"))?;
    if updated == 0 {
        return Err(ApiError::not_found("Skill not found"));
    }

    info!(skill_id, "skill updated");
    Ok(Json(MessageResponse::new(
        "Skill has been updated successfully!",
    )))
}

#[instrument(skip(state, current))]
pub async fn delete_skill(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(skill_id): Path<i32>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    current.require_role(&[ROLE_ADMIN])?;

    let deleted = repo::delete(&state.db, skill_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Skill not found"));
    }

    info!(skill_id, "skill deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Skill has been deleted successfully!")),
    ))
}
