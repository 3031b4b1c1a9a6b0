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

use super::repo::{self, Interest};

#[derive(Debug, Deserialize)]
pub struct InterestRequest {
    pub title: String,
}

pub fn interest_routes() -> Router<AppState> {
    Router::new()
        .route("/interests", get(get_interests).post(add_interest))
        .route(
            "/interests/:interest_id",
            get(get_interest).put(edit_interest).delete(delete_interest),
        )
}

#[instrument(skip(state, current, payload))]
pub async fn add_interest(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<InterestRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    require_len("title", &payload.title, 50)?;

    let created = repo::create(&state.db, &payload.title).await?;
    if created.is_none() {
        return Err(ApiError::conflict("Interest already exists!"));
    }

    info!(title = %payload.title, "interest created");
    Ok(Json(MessageResponse::new(
        "Interest has been added successfully!",
    )))
}

#[instrument(skip(state))]
pub async fn get_interests(State(state): State<AppState>) -> Result<Json<Vec<Interest>>, ApiError> {
    let interests = repo::list(&state.db).await?;
    Ok(Json(interests))
}

#[instrument(skip(state))]
pub async fn get_interest(
    State(state): State<AppState>,
    Path(interest_id): Path<i32>,
) -> Result<Json<Interest>, ApiError> {
    let interest = repo::find(&state.db, interest_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Interest is not found"))?;
    Ok(Json(interest))
}

#[instrument(skip(state, current, payload))]
pub async fn edit_interest(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(interest_id): Path<i32>,
    Json(payload): Json<InterestRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    require_len("title", &payload.title, 50)?;

    let updated = repo::rename(&state.db, interest_id, &payload.title)
        .await
        .map_err(|e| conflict_on_unique(e, "Interest already exists!"))?;
    if updated == 0 {
        return Err(ApiError::not_found("Interest is not found"));
    }

    info!(interest_id, "interest updated");
    Ok(Json(MessageResponse::new(
        "Interest has been updated successfully!",
    )))
}

#[instrument(skip(state, current))]
pub async fn delete_interest(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(interest_id): Path<i32>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    current.require_role(&[ROLE_ADMIN])?;

    let deleted = repo::delete(&state.db, interest_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Interest is not found"));
    }

    info!(interest_id, "interest deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "Interest has been deleted successfully!",
        )),
    ))
}
