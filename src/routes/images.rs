use crate::auth::jwt::IdTokenService;
use crate::auth::middleware::auth_middleware;
use crate::classifier::ClassifierHandle;
use crate::images::controller;
use crate::images::service::ImageService;
use crate::images::upload::MAX_BODY_SIZE;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(
    service: Arc<ImageService>,
    classifier: ClassifierHandle,
    tokens: Arc<IdTokenService>,
) -> Router {
    let public_routes = Router::new()
        .route("/api/images/:id", get(controller::get_image))
        .with_state(service.clone());

    let private_routes = Router::new()
        .route("/api/images/upload", post(controller::upload_image))
        .route("/api/images/myimages", get(controller::get_user_images))
        .route("/api/images/:id", delete(controller::delete_image))
        .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
        .with_state(service);

    let classify_routes = Router::new()
        .route("/api/images/classify", post(controller::classify_image))
        .with_state(classifier);

    public_routes
        .merge(private_routes)
        .merge(classify_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}
