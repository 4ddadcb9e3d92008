use axum::{Router, routing::{get, post, put}, middleware};
use std::sync::Arc;

use crate::handler::application_handler::{
    get_application_handler,
    list_activity_handler,
    list_applications_handler,
    my_application_handler,
    submit_application_handler,
    update_application_handler,
    update_status_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::application_service::ApplicationService;

pub fn application_router(service: Arc<dyn ApplicationService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/applications", post(submit_application_handler).get(list_applications_handler))
        .route("/applications/me", get(my_application_handler))
        .route("/applications/{id}", get(get_application_handler).put(update_application_handler))
        .route("/applications/{id}/status", put(update_status_handler))
        .route("/applications/{id}/activity", get(list_activity_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
