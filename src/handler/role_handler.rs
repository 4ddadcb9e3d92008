use axum::{extract::{Json, Path, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::role_dto::{CreateRoleRequest, UpdatePermissionsRequest};
use crate::model::principal::Principal;
use crate::service::role_service::RoleService;
use crate::util::error::HandlerError;

pub async fn list_roles_handler(
    State(service): State<Arc<dyn RoleService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_roles(&principal).await?))
}

pub async fn create_role_handler(
    State(service): State<Arc<dyn RoleService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let role = service.create_role(&principal, &payload.name, &payload.description, &payload.permissions).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn set_permissions_handler(
    State(service): State<Arc<dyn RoleService>>,
    Extension(principal): Extension<Principal>,
    Path((name,)): Path<(String,)>,
    Json(payload): Json<UpdatePermissionsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let role = service.set_permissions(&principal, &name, &payload.permissions).await?;
    Ok(Json(role))
}

pub async fn list_permissions_handler(
    State(service): State<Arc<dyn RoleService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_permissions(&principal).await?))
}
