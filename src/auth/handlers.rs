use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{LoginRequest, RegisterRequest, TokenResponse},
    jwt::JwtKeys,
    password, ROLE_DEFAULT,
};
use crate::error::{conflict_on_unique, ApiError};
use crate::state::AppState;
use crate::users::repo::{self, NewUser};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = match repo::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::unauthenticated("Incorrect username or password"));
        }
    };

    let ok = password::verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::unauthenticated("Incorrect username or password"));
    }

    let roles = repo::role_names(&state.db, user.id).await?;
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user.username, &roles).map_err(ApiError::Internal)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate()?;

    if repo::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::conflict("User already exists!"));
    }

    let password_hash = password::hash_password(&payload.password).map_err(ApiError::Internal)?;

    let user_id = repo::create(
        &state.db,
        NewUser {
            username: payload.username.clone(),
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
            status: payload.status,
            skills: Vec::new(),
            interests: Vec::new(),
            looking_for: Vec::new(),
            roles: vec![ROLE_DEFAULT.to_string()],
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, "User already exists!"))?;

    let roles = repo::role_names(&state.db, user_id).await?;
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign(&payload.username, &roles)
        .map_err(ApiError::Internal)?;

    info!(user_id, username = %payload.username, "user registered");
    Ok(Json(TokenResponse { access_token }))
}
