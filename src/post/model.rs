use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::comment::model::Comment;
use crate::controller::ApiError;

#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub user_id: Uuid,
    pub image_url: String,
    pub audio_url: Option<String>,
    pub caption: String,
    pub location: String,
    pub transcript: String,
    pub ai_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub likes: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[schema(value_type = UuidWrapper)]
    pub user_id: Uuid,
    pub image_url: String,
    pub audio_url: Option<String>,
    pub caption: String,
    pub location: String,
    pub transcript: String,
    /// Story score from 1 to 10, when one was computed
    pub ai_score: Option<i32>,
    #[schema(value_type = Vec<UuidWrapper>)]
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn from_row(row: PostRow, comments: Vec<Comment>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            image_url: row.image_url,
            audio_url: row.audio_url,
            caption: row.caption,
            location: row.location,
            transcript: row.transcript,
            ai_score: row.ai_score,
            likes: row.likes,
            comments,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[schema(example = "https://cdn.example.com/kapadokya.jpg")]
    pub image_url: String,
    pub audio_url: Option<String>,
    pub location: Option<String>,
    pub caption: Option<String>,
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub post_id: i64,
    #[schema(value_type = Vec<UuidWrapper>)]
    pub likes: Vec<Uuid>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Create your profile before posting")]
    ProfileRequired,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ApiError for PostError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) | Self::ProfileRequired => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ProfileRequired => "PROFILE_REQUIRED",
            Self::DatabaseError(_) | Self::SerializationError(_) => "INTERNAL_ERROR",
        }
    }
}
