use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::middleware::auth_middleware;
use crate::notification::controller;
use crate::websocket::notifications::{ws_handler, NotificationState};

/// Notification listing plus the realtime socket. The socket authenticates
/// through its `token` query parameter, not the bearer header.
pub fn routes(state: NotificationState) -> Router {
    let socket_routes = Router::new()
        .route("/api/notifications/ws", get(ws_handler))
        .with_state(state.clone());

    let private_routes = Router::new()
        .route("/api/notifications", get(controller::list_notifications))
        .route("/api/notifications/read-all", post(controller::mark_all_read))
        .route("/api/notifications/:id/read", post(controller::mark_read))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ))
        .with_state(state.notifications);

    socket_routes.merge(private_routes)
}
