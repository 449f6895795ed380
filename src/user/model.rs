use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::controller::ApiError;

pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MAX_BIO_LENGTH: usize = 500;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub bio: String,
    pub photo_url: Option<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile as the API renders it, with follow edges flattened to id lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = UuidWrapper)]
    pub id: Uuid,
    pub email: String,
    #[schema(example = "gezgin_ayse")]
    pub username: String,
    pub bio: String,
    pub photo_url: Option<String>,
    pub interests: Vec<String>,
    #[schema(value_type = Vec<UuidWrapper>)]
    pub followers: Vec<Uuid>,
    #[schema(value_type = Vec<UuidWrapper>)]
    pub following: Vec<Uuid>,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_row(row: UserRow, followers: Vec<Uuid>, following: Vec<Uuid>) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            bio: row.bio,
            photo_url: row.photo_url,
            interests: row.interests,
            followers,
            following,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(value_type = UuidWrapper)]
    pub id: Uuid,
    pub username: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[schema(example = "gezgin_ayse")]
    pub username: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    #[schema(value_type = UuidWrapper)]
    pub user_id: Uuid,
    pub following: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Profile already exists")]
    ProfileExists,

    #[error("You can only edit your own profile")]
    Forbidden,

    #[error("You cannot follow yourself")]
    SelfFollow,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ApiError for UserError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ProfileExists => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::SelfFollow | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ProfileExists => "PROFILE_EXISTS",
            Self::Forbidden => "FORBIDDEN",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::DatabaseError(_) | Self::SerializationError(_) => "INTERNAL_ERROR",
        }
    }
}

pub fn validate_username(username: &str) -> Result<String, UserError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UserError::InvalidInput("Username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UserError::InvalidInput(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(username.to_string())
}

/// Trimmed, non-empty, de-duplicated interests in their original order
pub fn normalize_interests(interests: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(interests.len());
    for interest in interests {
        let interest = interest.trim().to_string();
        if !interest.is_empty() && !normalized.contains(&interest) {
            normalized.push(interest);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  ayse ").unwrap(), "ayse");
        assert!(matches!(
            validate_username("   "),
            Err(UserError::InvalidInput(_))
        ));
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_normalize_interests() {
        let interests = vec![
            " hiking".to_string(),
            "".to_string(),
            "food".to_string(),
            "hiking".to_string(),
        ];
        assert_eq!(normalize_interests(interests), vec!["hiking", "food"]);
    }

    #[test]
    fn test_profile_json_shape() {
        let follower = Uuid::new_v4();
        let profile = UserProfile::from_row(
            UserRow {
                id: Uuid::new_v4(),
                email: "ayse@example.com".to_string(),
                username: "ayse".to_string(),
                bio: String::new(),
                photo_url: None,
                interests: vec!["beaches".to_string()],
                created_at: Utc::now(),
            },
            vec![follower],
            vec![],
        );

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["followers"][0], follower.to_string());
        assert_eq!(json["following"], serde_json::json!([]));
        assert!(json.get("photoUrl").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(UserError::SelfFollow.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(UserError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(UserError::ProfileExists.status_code(), StatusCode::CONFLICT);
    }
}
