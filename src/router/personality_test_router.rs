use axum::{Router, routing::{get, post}, middleware};
use std::sync::Arc;

use crate::handler::personality_test_handler::{
    create_template_handler,
    get_test_handler,
    list_templates_handler,
    start_test_handler,
    submit_answers_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::personality_test_service::PersonalityTestService;

pub fn personality_test_router(service: Arc<dyn PersonalityTestService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/personality-tests/templates",
            post(create_template_handler).get(list_templates_handler),
        )
        .route("/personality-tests", post(start_test_handler))
        .route("/personality-tests/{id}", get(get_test_handler))
        .route("/personality-tests/{id}/answers", post(submit_answers_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
