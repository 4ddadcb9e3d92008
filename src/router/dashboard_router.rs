use axum::{Router, routing::get, middleware};
use std::sync::Arc;

use crate::handler::dashboard_handler::dashboard_handler;
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::dashboard_service::DashboardService;

pub fn dashboard_router(service: Arc<dyn DashboardService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
