use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::validate::require_len;

#[derive(Debug, Serialize)]
pub struct TagDto {
    pub id: i32,
    pub title: String,
}

/// Public projection of a user. The password hash never leaves the repo
/// layer; roles are not exposed either.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub skills: Vec<TagDto>,
    pub interests: Vec<TagDto>,
    pub looking_for: Vec<TagDto>,
}

/// Admin-side user creation. Skills, interests and looking_for are skill or
/// interest titles; roles are role names; status is a status name.
#[derive(Debug, Deserialize)]
pub struct UserAddRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub looking_for: Vec<String>,
    pub status: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserAddRequest {
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

/// Profile edit. Every submitted association list replaces the stored set
/// wholesale; an empty list clears it. Password is not editable here.
#[derive(Debug, Deserialize)]
pub struct UserEditRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub looking_for: Vec<String>,
    pub status: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserEditRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_len("username", &self.username, 25)?;
        require_len("first_name", &self.first_name, 50)?;
        require_len("last_name", &self.last_name, 50)?;
        if let Some(bio) = &self.bio {
            require_len("bio", bio, 200)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dto_serializes_nullable_fields() {
        let dto = UserDto {
            id: 1,
            username: "ahmed".into(),
            first_name: "ahmed".into(),
            last_name: "ahmed".into(),
            bio: None,
            status: Some("Ищу людей в проект".into()),
            skills: vec![TagDto {
                id: 3,
                title: "Rust".into(),
            }],
            interests: vec![],
            looking_for: vec![],
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["bio"], serde_json::Value::Null);
        assert_eq!(json["status"], "Ищу людей в проект");
        assert_eq!(json["skills"][0]["title"], "Rust");
    }

    #[test]
    fn add_request_association_lists_default_to_empty() {
        let req: UserAddRequest = serde_json::from_str(
            r#"{"username":"a","password":"b","first_name":"c","last_name":"d","status":"s"}"#,
        )
        .unwrap();
        assert!(req.skills.is_empty());
        assert!(req.roles.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn validate_enforces_the_field_limits() {
        let mut req: UserAddRequest = serde_json::from_str(
            r#"{"username":"a","password":"b","first_name":"c","last_name":"d","status":"s"}"#,
        )
        .unwrap();
        req.username = "x".repeat(26);
        assert!(req.validate().is_err());
    }
}
