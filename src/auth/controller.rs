use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::jwt::IdTokenService;
use super::service::{self, AuthResult, LoginData, RegisterData};
use crate::controller::{error_response, ErrorResponse};

// Request DTOs
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ayse@example.com")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ayse@example.com")]
    pub email: String,
    pub password: String,
}

// Response DTOs
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[schema(value_type = UuidWrapper)]
    pub uid: uuid::Uuid,
    pub email: String,
    /// ID token to send as `Authorization: Bearer <token>`
    pub token: String,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            uid: result.uid,
            email: result.email,
            token: result.token,
        }
    }
}

// Controller for account registration
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered successfully", body = AuthResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    tag = "authentication"
)]
pub async fn register(
    State((pool, tokens)): State<(PgPool, Arc<IdTokenService>)>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    info!("Registration request received for email: {}", req.email);

    let data = RegisterData {
        email: req.email,
        password: req.password,
    };

    match service::register(&pool, &tokens, data).await {
        Ok(result) => (StatusCode::CREATED, Json(AuthResponse::from(result))).into_response(),
        Err(error) => error_response(error),
    }
}

// Controller for account login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "authentication"
)]
pub async fn login(
    State((pool, tokens)): State<(PgPool, Arc<IdTokenService>)>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let data = LoginData {
        email: req.email,
        password: req.password,
    };

    match service::login(&pool, &tokens, data).await {
        Ok(result) => (StatusCode::OK, Json(AuthResponse::from(result))).into_response(),
        Err(error) => error_response(error),
    }
}
