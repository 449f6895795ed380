use crate::auth::jwt::IdTokenService;
use crate::auth::middleware::auth_middleware;
use crate::post::controller;
use crate::post::service::PostService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<PostService>, tokens: Arc<IdTokenService>) -> Router {
    let public_routes = Router::new()
        .route("/api/posts/:id", get(controller::get_post))
        .route("/api/posts/user/:user_id", get(controller::get_user_posts))
        .with_state(service.clone());

    let private_routes = Router::new()
        .route("/api/posts", post(controller::create_post))
        .route("/api/posts/feed", get(controller::get_feed))
        .route(
            "/api/posts/:id/like",
            post(controller::like_post).delete(controller::unlike_post),
        )
        .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
        .with_state(service);

    public_routes.merge(private_routes)
}
