use axum::{extract::{Json, Query, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::user_dto::{
    CreateUserRequest, ListUsersQuery, LoginRequest, RefreshTokenRequest, RegisterRequest,
    VerificationIssuedResponse, VerifyEmailRequest,
};
use crate::model::principal::Principal;
use crate::repository::Page;
use crate::service::user_service::UserService;
use crate::util::error::HandlerError;

// Register
pub async fn register_handler(
    State(service): State<Arc<dyn UserService>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let res = service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

// Login
pub async fn login_handler(
    State(service): State<Arc<dyn UserService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let res = service.login(payload.email, payload.password).await?;
    Ok(Json(res))
}

// Refresh Token
pub async fn refresh_token_handler(
    State(service): State<Arc<dyn UserService>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let res = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(res))
}

pub async fn verify_email_handler(
    State(service): State<Arc<dyn UserService>>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let user = service.verify_email(payload.token).await?;
    Ok(Json(user))
}

pub async fn me_handler(
    State(service): State<Arc<dyn UserService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.get_profile(principal.user_id).await?;
    Ok(Json(user))
}

pub async fn request_verification_handler(
    State(service): State<Arc<dyn UserService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    let (_token, expires_at) = service.request_email_verification(principal.user_id).await?;
    Ok(Json(VerificationIssuedResponse {
        message: "Verification token issued".to_string(),
        expires_at,
    }))
}

// Staff-created accounts
pub async fn create_user_handler(
    State(service): State<Arc<dyn UserService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let user = service.create_user(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users_handler(
    State(service): State<Arc<dyn UserService>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = service.list_users(&principal, params.role, Page::new(params.page, params.limit)).await?;
    Ok(Json(users))
}
