use axum::{body::Body, extract::State, http::{header, Request}, middleware::Next, response::Response};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::model::principal::Principal;
use crate::service::role_service::RoleService;
use crate::service::user_service::UserService;
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_service: Arc<dyn UserService>,
    pub role_service: Arc<dyn RoleService>,
}

fn unauthorized(message: &str) -> HandlerError {
    HandlerError::new(HandlerErrorKind::Unauthorized, message)
}

/// Resolves the bearer token into a [`Principal`] request extension.
///
/// The account is reloaded on every request so a deactivated user loses
/// access before the token expires.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| unauthorized("Malformed authorization header"))?;
    let claims = state.jwt_utils.validate_access_token(&token).map_err(|e| {
        warn!("Rejected access token: {e}");
        unauthorized("Invalid or expired token")
    })?;
    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| unauthorized("Invalid token subject"))?;

    let user = state.user_service.find_active(user_id).await?;
    let permissions = state.role_service.permissions_for(user.role).await?;
    debug!(user_id = %user_id, role = %user.role, "Request authenticated");

    req.extensions_mut().insert(Principal::new(user_id, user.email, user.role, permissions));
    Ok(next.run(req).await)
}
