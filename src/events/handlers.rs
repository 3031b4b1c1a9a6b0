use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::auth::{extractors::CurrentUser, ROLE_ADMIN};
use crate::error::ApiError;
use crate::response::MessageResponse;
use crate::state::AppState;

use super::dto::{
    parse_event_date, timestamp_bound, validate_event_fields, EventAddRequest, EventDto,
    EventEditRequest,
};
use super::repo::{self, EventChange, EventRow};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(get_events))
        .route("/events/:event_id", get(get_event))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(add_event))
        .route("/events/:event_id", put(edit_event))
        .route("/events/:event_id", delete(delete_event))
}

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

async fn to_dtos(db: &PgPool, rows: Vec<EventRow>) -> Result<Vec<EventDto>, ApiError> {
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let mut members = repo::members_for_events(db, &ids).await?;
    let mut tags = repo::tags_for_events(db, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| EventDto {
            members: members.remove(&r.id).unwrap_or_default(),
            tags: tags.remove(&r.id).unwrap_or_default(),
            id: r.id,
            title: r.title,
            description: r.description,
            date: r.date,
        })
        .collect())
}

#[instrument(skip(state, current, payload))]
pub async fn add_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<EventAddRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    validate_event_fields(&payload.title, &payload.description)?;
    let date = parse_event_date(&payload.date)?;

    let event_id = repo::create(
        &state.db,
        EventChange {
            title: payload.title,
            description: payload.description,
            date,
            members: payload.members,
            tags: payload.tags,
        },
    )
    .await?;

    info!(event_id, "event created");
    Ok(Json(MessageResponse::new(
        "Event has been added successfully!",
    )))
}

#[instrument(skip(state))]
pub async fn get_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<EventDto>>, ApiError> {
    let start = filter.start_date.map(timestamp_bound).transpose()?;
    let end = filter.end_date.map(timestamp_bound).transpose()?;

    let rows = repo::list(&state.db, start, end).await?;
    let events = to_dtos(&state.db, rows).await?;
    Ok(Json(events))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
) -> Result<Json<EventDto>, ApiError> {
    let row = repo::find(&state.db, event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))?;
    let mut events = to_dtos(&state.db, vec![row]).await?;
    Ok(Json(events.remove(0)))
}

#[instrument(skip(state, current, payload))]
pub async fn edit_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<i32>,
    Json(payload): Json<EventEditRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    validate_event_fields(&payload.title, &payload.description)?;
    let date = parse_event_date(&payload.date)?;

    if repo::find(&state.db, event_id).await?.is_none() {
        return Err(ApiError::not_found("Event not found"));
    }

    repo::update(
        &state.db,
        event_id,
        EventChange {
            title: payload.title,
            description: payload.description,
            date,
            members: payload.members,
            tags: payload.tags,
        },
    )
    .await?;

    info!(event_id, "event updated");
    Ok(Json(MessageResponse::new(
        "Event has been updated successfully!",
    )))
}

#[instrument(skip(state, current))]
pub async fn delete_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<i32>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    current.require_role(&[ROLE_ADMIN])?;

    let deleted = repo::delete(&state.db, event_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Event not found"));
    }

    info!(event_id, "event deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Event has been deleted successfully!")),
    ))
}
