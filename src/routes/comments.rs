use crate::auth::jwt::IdTokenService;
use crate::auth::middleware::auth_middleware;
use crate::comment::controller::{create_comment, get_post_comments};
use crate::comment::service::CommentService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create a router for comment routes
pub fn routes(comment_service: Arc<CommentService>, tokens: Arc<IdTokenService>) -> Router {
    Router::new()
        .route("/api/posts/:id/comments", get(get_post_comments))
        .route(
            "/api/posts/:id/comment",
            post(create_comment).route_layer(middleware::from_fn_with_state(tokens, auth_middleware)),
        )
        .with_state(comment_service)
}
