use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::classifier::ClassifierHandle;
use crate::db;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    #[schema(example = "ok")]
    pub database: String,
    #[schema(example = "ready")]
    pub model: String,
}

/// Liveness plus database and model readiness
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health_check(
    State((pool, classifier)): State<(PgPool, ClassifierHandle)>,
) -> impl IntoResponse {
    let database = if db::ping(&pool).await { "ok" } else { "error" };
    let model = if classifier.is_ready() {
        "ready"
    } else {
        "unavailable"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            database: database.to_string(),
            model: model.to_string(),
        }),
    )
}

pub fn routes(pool: PgPool, classifier: ClassifierHandle) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state((pool, classifier))
}
