use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::validate::require_len;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for self-registration. Roles are not accepted here; every
/// registered user gets DEFAULT only.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub status: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_len("username", &self.username, 25)?;
        require_len("password", &self.password, 25)?;
        require_len("first_name", &self.first_name, 50)?;
        require_len("last_name", &self.last_name, 50)?;
        if let Some(bio) = &self.bio {
            require_len("bio", bio, 200)?;
        }
        Ok(())
    }
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}
