use axum::{Router, routing::{post, put}, middleware};
use std::sync::Arc;

use crate::handler::document_handler::{list_documents_handler, register_document_handler, review_document_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::document_service::DocumentService;

pub fn document_router(service: Arc<dyn DocumentService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/applications/{id}/documents",
            post(register_document_handler).get(list_documents_handler),
        )
        .route("/documents/{id}/review", put(review_document_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
