use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::controller::ApiError;

pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    #[schema(value_type = UuidWrapper)]
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub text: String,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    #[schema(example = "Harika manzara!")]
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Post not found")]
    PostNotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Create your profile before commenting")]
    ProfileRequired,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl ApiError for CommentError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::PostNotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) | Self::ProfileRequired => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::PostNotFound => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ProfileRequired => "PROFILE_REQUIRED",
            Self::DatabaseError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Trimmed comment text, or a validation error
pub fn validate_comment_text(text: &str) -> Result<String, CommentError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommentError::InvalidInput(
            "Comment text is required".to_string(),
        ));
    }
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CommentError::InvalidInput(format!(
            "Comment must be at most {} characters",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(text.to_string())
}
