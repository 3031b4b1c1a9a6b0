use axum::Router;

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_DEFAULT: &str = "DEFAULT";

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
