use axum::{Router, routing::{get, put}, middleware};
use std::sync::Arc;

use crate::handler::notification_handler::{list_notifications_handler, mark_read_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::notification_service::NotificationService;

pub fn notification_router(service: Arc<dyn NotificationService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/{id}/read", put(mark_read_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
