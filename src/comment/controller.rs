use crate::auth::middleware::AuthUser;
use crate::comment::model::{Comment, CreateCommentRequest};
use crate::comment::service::CommentService;
use crate::controller::{error_response, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Comment on a post
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Missing or too long text", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    user: AuthUser,
    State(service): State<Arc<CommentService>>,
    Path(post_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> Response {
    match service
        .create_comment(post_id, user.uid, &request.text)
        .await
    {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = [Comment]),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "comments"
)]
pub async fn get_post_comments(
    State(service): State<Arc<CommentService>>,
    Path(post_id): Path<i64>,
) -> Response {
    match service.get_post_comments(post_id).await {
        Ok(comments) => (StatusCode::OK, Json(comments)).into_response(),
        Err(e) => error_response(e),
    }
}
