use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::controller::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Like,
    Comment,
    Follow,
    Mention,
}

impl NotificationType {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "follow" => Some(Self::Follow),
            "mention" => Some(Self::Mention),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
            Self::Mention => "mention",
        }
    }
}

/// What a like/comment/follow hands to the notification service
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub notification_type: NotificationType,
    pub post_id: Option<i64>,
    pub content: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: i64,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: Option<String>,
    pub notification_type: String,
    pub post_id: Option<i64>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[schema(value_type = UuidWrapper)]
    pub recipient_id: Uuid,
    #[schema(value_type = UuidWrapper)]
    pub sender_id: Uuid,
    pub sender_name: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub post_id: Option<i64>,
    pub content: String,
    /// Rendered, human-readable text
    pub message: String,
    pub is_read: bool,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

impl NotificationRow {
    pub fn into_notification(self) -> Result<Notification, NotificationError> {
        let notification_type = NotificationType::from_db(&self.notification_type).ok_or_else(
            || NotificationError::InternalError(format!("Unknown type {}", self.notification_type)),
        )?;
        let sender_name = self.sender_name.unwrap_or_else(|| "Someone".to_string());
        let message = render_message(notification_type, &sender_name, &self.content);

        Ok(Notification {
            id: self.id,
            recipient_id: self.recipient_id,
            sender_id: self.sender_id,
            sender_name,
            notification_type,
            post_id: self.post_id,
            content: self.content,
            message,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

pub fn render_message(notification_type: NotificationType, sender_name: &str, content: &str) -> String {
    match notification_type {
        NotificationType::Like => format!("{} liked your post", sender_name),
        NotificationType::Comment => format!("{} commented on your post: {}", sender_name, content),
        NotificationType::Follow => format!("{} started following you", sender_name),
        NotificationType::Mention => format!("{} mentioned you: {}", sender_name, content),
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Notification not found")]
    NotFound,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError for NotificationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::DatabaseError(_) | Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}
