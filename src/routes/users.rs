use crate::auth::jwt::IdTokenService;
use crate::auth::middleware::auth_middleware;
use crate::user::controller;
use crate::user::service::UserService;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>, tokens: Arc<IdTokenService>) -> Router {
    // Static segments win over `:id`, so search is not read as a user id
    let public_routes = Router::new()
        .route("/api/users/search", get(controller::search_users))
        .route("/api/users/:id", get(controller::get_profile))
        .with_state(service.clone());

    let private_routes = Router::new()
        .route("/api/users", post(controller::create_profile))
        .route("/api/users/:id", put(controller::update_profile))
        .route(
            "/api/users/:id/follow",
            post(controller::follow).delete(controller::unfollow),
        )
        .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
        .with_state(service);

    public_routes.merge(private_routes)
}
