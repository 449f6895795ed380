use crate::auth::middleware::AuthUser;
use crate::controller::{error_response, ErrorResponse};
use crate::user::model::{
    CreateProfileRequest, FollowResponse, UpdateProfileRequest, UserProfile, UserSummary,
};
use crate::user::service::UserService;
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
pub struct SearchParams {
    /// Username prefix, matched case-insensitively
    #[serde(default)]
    pub q: String,
    /// Maximum number of results (default 20, max 50)
    pub limit: Option<i64>,
}

/// Create the caller's profile
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = UserProfile),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Profile already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_profile(
    user: AuthUser,
    State(service): State<Arc<UserService>>,
    Json(request): Json<CreateProfileRequest>,
) -> Response {
    info!("Creating profile for user {}", user.uid);

    match service.create_profile(user.uid, &user.email, request).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Get a user profile with follower and following ids
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_profile(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.get_profile(&id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 403, description = "Not the profile owner", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_profile(
    user: AuthUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Response {
    match service.update_profile(&user.uid, &id, request).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/follow",
    params(("id" = String, Path, description = "User to follow")),
    responses(
        (status = 200, description = "Now following", body = FollowResponse),
        (status = 400, description = "Cannot follow yourself", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn follow(
    user: AuthUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.follow(&user.uid, &id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(FollowResponse {
                user_id: id,
                following: true,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/follow",
    params(("id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = FollowResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn unfollow(
    user: AuthUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.unfollow(&user.uid, &id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(FollowResponse {
                user_id: id,
                following: false,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Search users by username prefix
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users", body = [UserSummary])
    ),
    tag = "users"
)]
pub async fn search_users(
    State(service): State<Arc<UserService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match service.search(&params.q, params.limit).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => error_response(e),
    }
}
