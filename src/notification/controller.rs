use crate::auth::middleware::AuthUser;
use crate::controller::{error_response, ErrorResponse, MessageResponse};
use crate::notification::model::{MarkAllReadResponse, NotificationListResponse};
use crate::notification::service::NotificationService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationListParams {
    /// Maximum number of notifications (default 50, max 100)
    pub limit: Option<i64>,
}

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationListParams),
    responses(
        (status = 200, description = "Notifications with unread count", body = NotificationListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    user: AuthUser,
    State(service): State<Arc<NotificationService>>,
    Query(params): Query<NotificationListParams>,
) -> Response {
    match service.list_for_user(&user.uid, params.limit).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked as read", body = MessageResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_read(
    user: AuthUser,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.mark_as_read(&user.uid, id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Notification marked as read".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "Number of notifications updated", body = MarkAllReadResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_all_read(
    user: AuthUser,
    State(service): State<Arc<NotificationService>>,
) -> Response {
    match service.mark_all_as_read(&user.uid).await {
        Ok(updated) => (StatusCode::OK, Json(MarkAllReadResponse { updated })).into_response(),
        Err(e) => error_response(e),
    }
}
