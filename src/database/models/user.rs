use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const USERNAME_MAX_LENGTH: usize = 150;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@.+_-]+$").expect("valid username pattern"));

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::for_field(
            "username",
            "This field is required.",
        ));
    }

    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(ValidationError::for_field(
            "username",
            format!(
                "Ensure this value has at most {} characters.",
                USERNAME_MAX_LENGTH
            ),
        ));
    }

    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::for_field(
            "username",
            "Enter a valid username. This value may contain only English letters, \
             numbers, and @/./+/-/_ characters.",
        ));
    }

    Ok(())
}
