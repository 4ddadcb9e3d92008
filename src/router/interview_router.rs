use axum::{Router, routing::{post, put}, middleware};
use std::sync::Arc;

use crate::handler::interview_handler::{
    cancel_interview_handler,
    list_interviews_handler,
    recommend_handler,
    schedule_interview_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::interview_service::InterviewService;

pub fn interview_router(service: Arc<dyn InterviewService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/interviews", post(schedule_interview_handler).get(list_interviews_handler))
        .route("/interviews/{id}/recommendation", put(recommend_handler))
        .route("/interviews/{id}/cancel", put(cancel_interview_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
