use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::{JwtKeys, TokenError};
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::{self, User};

/// Authenticated caller, resolved against the live user record.
///
/// Roles are re-read from the database on every request instead of being
/// taken from the token claim, so revoking a role locks the user out
/// immediately rather than at token expiry.
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<String>,
}

impl CurrentUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Require membership in at least one of `allowed`.
    pub fn require_role(&self, allowed: &[&str]) -> Result<(), ApiError> {
        if self.roles.iter().any(|r| allowed.contains(&r.as_str())) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "User is not eligible to access this method",
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthenticated("Missing Authorization header"))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::unauthenticated("Invalid Authorization header"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            match e {
                TokenError::Expired => ApiError::unauthenticated("Token expired"),
                TokenError::Malformed => ApiError::unauthenticated("Invalid token"),
            }
        })?;

        let user = repo::find_by_username(&state.db, &claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(username = %claims.sub, "token subject no longer exists");
                ApiError::unauthenticated("User is invalid!")
            })?;

        let roles = repo::role_names(&state.db, user.id).await?;

        Ok(CurrentUser { user, roles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ROLE_ADMIN, ROLE_DEFAULT};

    fn caller(roles: &[&str]) -> CurrentUser {
        CurrentUser {
            user: User {
                id: 1,
                username: "ahmed".into(),
                password_hash: "irrelevant".into(),
                first_name: "ahmed".into(),
                last_name: "ahmed".into(),
                bio: None,
                status_id: None,
            },
            roles: roles.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn admin_passes_admin_gate() {
        assert!(caller(&[ROLE_ADMIN, ROLE_DEFAULT])
            .require_role(&[ROLE_ADMIN])
            .is_ok());
    }

    #[test]
    fn default_only_user_is_forbidden() {
        let err = caller(&[ROLE_DEFAULT])
            .require_role(&[ROLE_ADMIN])
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn user_with_no_roles_fails_every_gate() {
        let c = caller(&[]);
        assert!(c.require_role(&[ROLE_ADMIN]).is_err());
        assert!(c.require_role(&[ROLE_DEFAULT, ROLE_ADMIN]).is_err());
    }

    #[test]
    fn any_overlap_is_enough() {
        assert!(caller(&[ROLE_DEFAULT])
            .require_role(&[ROLE_DEFAULT, ROLE_ADMIN])
            .is_ok());
    }

    #[test]
    fn has_role_is_exact_match() {
        let c = caller(&[ROLE_ADMIN]);
        assert!(c.has_role(ROLE_ADMIN));
        assert!(!c.has_role("admin"));
    }
}
