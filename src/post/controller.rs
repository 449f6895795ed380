use crate::auth::middleware::AuthUser;
use crate::controller::{error_response, ErrorResponse};
use crate::post::model::{CreatePostRequest, LikeResponse, Post};
use crate::post::service::PostService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedParams {
    /// Maximum number of posts (default 20, max 50)
    pub limit: Option<i64>,
}

/// Create a travel post
///
/// A caption is generated when none is given and a story score is computed
/// from the transcript, if the AI assistant is configured.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created successfully", body = Post),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn create_post(
    user: AuthUser,
    State(service): State<Arc<PostService>>,
    Json(request): Json<CreatePostRequest>,
) -> Response {
    info!("Creating post for user {}", user.uid);

    match service.create_post(user.uid, request).await {
        Ok(post) => (StatusCode::CREATED, Json(post)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Posts from the caller and the users they follow, newest first
#[utoipa::path(
    get,
    path = "/api/posts/feed",
    params(FeedParams),
    responses(
        (status = 200, description = "Feed posts", body = [Post]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn get_feed(
    user: AuthUser,
    State(service): State<Arc<PostService>>,
    Query(params): Query<FeedParams>,
) -> Response {
    match service.feed(&user.uid, params.limit).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn get_post(State(service): State<Arc<PostService>>, Path(id): Path<i64>) -> Response {
    match service.get_post(id).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/user/{userId}",
    params(("userId" = String, Path, description = "Author's user ID")),
    responses(
        (status = 200, description = "The user's posts, newest first", body = [Post])
    ),
    tag = "posts"
)]
pub async fn get_user_posts(
    State(service): State<Arc<PostService>>,
    Path(user_id): Path<Uuid>,
) -> Response {
    match service.user_posts(&user_id).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post liked", body = LikeResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn like_post(
    user: AuthUser,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.like(id, &user.uid).await {
        Ok(likes) => (StatusCode::OK, Json(LikeResponse { post_id: id, likes })).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like removed", body = LikeResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn unlike_post(
    user: AuthUser,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.unlike(id, &user.uid).await {
        Ok(likes) => (StatusCode::OK, Json(LikeResponse { post_id: id, likes })).into_response(),
        Err(e) => error_response(e),
    }
}
