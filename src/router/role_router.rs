use axum::{Router, routing::{get, put}, middleware};
use std::sync::Arc;

use crate::handler::role_handler::{
    create_role_handler,
    list_permissions_handler,
    list_roles_handler,
    set_permissions_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::role_service::RoleService;

pub fn role_router(service: Arc<dyn RoleService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/roles", get(list_roles_handler).post(create_role_handler))
        .route("/roles/{name}/permissions", put(set_permissions_handler))
        .route("/permissions", get(list_permissions_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
