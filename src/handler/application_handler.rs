use axum::{extract::{Json, Path, Query, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::application_dto::{ApplicationFormRequest, ListApplicationsQuery, UpdateStatusRequest};
use crate::handler::parse_id;
use crate::model::principal::Principal;
use crate::repository::Page;
use crate::service::application_service::ApplicationService;
use crate::util::error::HandlerError;

pub async fn submit_application_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ApplicationFormRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let application = service.submit(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn my_application_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.get_own(&principal).await?))
}

pub async fn list_applications_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListApplicationsQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = Page::new(params.page, params.limit);
    Ok(Json(service.list(&principal, params.status, page).await?))
}

pub async fn get_application_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "application")?;
    Ok(Json(service.get(&principal, id).await?))
}

pub async fn update_application_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<ApplicationFormRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "application")?;
    payload.validate()?;
    Ok(Json(service.update(&principal, id, payload).await?))
}

pub async fn update_status_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "application")?;
    payload.validate()?;
    let application = service.update_status(&principal, id, payload.status, payload.remarks).await?;
    Ok(Json(application))
}

pub async fn list_activity_handler(
    State(service): State<Arc<dyn ApplicationService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "application")?;
    Ok(Json(service.list_activity(&principal, id).await?))
}
