use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{extractors::CurrentUser, password, ROLE_ADMIN, ROLE_DEFAULT};
use crate::error::{conflict_on_unique, ApiError};
use crate::response::MessageResponse;
use crate::state::AppState;

use super::dto::{UserAddRequest, UserDto, UserEditRequest};
use super::repo::{self, NewUser, UserUpdate};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users))
        .route("/users/:user_id", get(get_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(add_user))
        .route("/users/:user_id", put(edit_user))
        .route("/users/:user_id", delete(delete_user))
}

#[instrument(skip(state, current, payload))]
pub async fn add_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UserAddRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_ADMIN])?;
    payload.validate()?;

    if repo::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("User already exists!"));
    }

    let password_hash = password::hash_password(&payload.password).map_err(ApiError::Internal)?;

    // Every user carries DEFAULT, whatever the caller submitted
    let mut roles = payload.roles;
    if !roles.iter().any(|r| r == ROLE_DEFAULT) {
        roles.push(ROLE_DEFAULT.to_string());
    }

    let user_id = repo::create(
        &state.db,
        NewUser {
            username: payload.username,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
            status: Some(payload.status),
            skills: payload.skills,
            interests: payload.interests,
            looking_for: payload.looking_for,
            roles,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, "User already exists!"))?;

    info!(user_id, "user created");
    Ok(Json(MessageResponse::new("User has been added successfully!")))
}

#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let rows = repo::list(&state.db).await?;
    let users = repo::load_dtos(&state.db, rows).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserDto>, ApiError> {
    let row = repo::get_with_status(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let mut users = repo::load_dtos(&state.db, vec![row]).await?;
    Ok(Json(users.remove(0)))
}

#[instrument(skip(state, current, payload))]
pub async fn edit_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i32>,
    Json(payload): Json<UserEditRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(&[ROLE_DEFAULT, ROLE_ADMIN])?;

    // Own profile, or ADMIN for everyone else's
    if current.user.id != user_id && !current.has_role(ROLE_ADMIN) {
        warn!(
            caller = current.user.id,
            target = user_id,
            "profile edit denied"
        );
        return Err(ApiError::forbidden("You are not allowed to edit this user!"));
    }

    payload.validate()?;

    if repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    if let Some(existing) = repo::find_by_username(&state.db, &payload.username).await? {
        if existing.id != user_id {
            return Err(ApiError::conflict("User already exists!"));
        }
    }

    repo::update(
        &state.db,
        user_id,
        UserUpdate {
            username: payload.username,
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
            status: Some(payload.status),
            skills: payload.skills,
            interests: payload.interests,
            looking_for: payload.looking_for,
            roles: payload.roles,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, "User already exists!"))?;

    info!(user_id, "user updated");
    Ok(Json(MessageResponse::new(
        "User has been updated successfully!",
    )))
}

#[instrument(skip(state, current))]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    current.require_role(&[ROLE_ADMIN])?;

    let deleted = repo::delete(&state.db, user_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    info!(user_id, "user deleted");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("User has been deleted successfully!")),
    ))
}
