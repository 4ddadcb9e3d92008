use axum::{Router, routing::{get, post}, middleware};
use std::sync::Arc;

use crate::handler::user_handler::{
    create_user_handler,
    list_users_handler,
    login_handler,
    me_handler,
    refresh_token_handler,
    register_handler,
    request_verification_handler,
    verify_email_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::user_service::UserService;

pub fn user_router(service: Arc<dyn UserService>, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/users/register", post(register_handler))
        .route("/users/login", post(login_handler))
        .route("/users/refresh-token", post(refresh_token_handler))
        .route("/users/verify-email", post(verify_email_handler));

    let authenticated = Router::new()
        .route("/users/me", get(me_handler))
        .route("/users/verify-email/request", post(request_verification_handler))
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    public
        .merge(authenticated)
        .with_state(service)
}
