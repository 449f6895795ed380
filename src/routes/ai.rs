use crate::assistant::controller::{get_recommendations, AssistantState};
use crate::auth::jwt::IdTokenService;
use crate::auth::middleware::auth_middleware;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub fn routes(state: AssistantState, tokens: Arc<IdTokenService>) -> Router {
    Router::new()
        .route("/api/ai/recommendations", get(get_recommendations))
        .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
        .with_state(state)
}
