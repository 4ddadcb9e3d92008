use axum::{Router, routing::{get, post}, middleware};
use std::sync::Arc;

use crate::handler::evaluation_handler::{get_evaluation_handler, list_evaluations_handler, submit_evaluation_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::evaluation_service::EvaluationService;

pub fn evaluation_router(service: Arc<dyn EvaluationService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/evaluations", post(submit_evaluation_handler).get(list_evaluations_handler))
        .route("/evaluations/{id}", get(get_evaluation_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
