use crate::auth::controller;
use crate::auth::jwt::IdTokenService;
use axum::{routing::post, Router};
use sqlx::PgPool;
use std::sync::Arc;

/// Authentication routes for login and registration
pub fn routes(pool: PgPool, tokens: Arc<IdTokenService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(controller::login))
        .route("/api/auth/register", post(controller::register))
        .with_state((pool, tokens))
}
