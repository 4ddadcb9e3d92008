use axum::{extract::{Json, Path, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::document_dto::{RegisterDocumentRequest, ReviewDocumentRequest};
use crate::handler::parse_id;
use crate::model::principal::Principal;
use crate::service::document_service::DocumentService;
use crate::util::error::HandlerError;

pub async fn register_document_handler(
    State(service): State<Arc<dyn DocumentService>>,
    Extension(principal): Extension<Principal>,
    Path((application_id,)): Path<(String,)>,
    Json(payload): Json<RegisterDocumentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let application_id = parse_id(&application_id, "application")?;
    payload.validate()?;
    let document = service.register(&principal, application_id, payload).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents_handler(
    State(service): State<Arc<dyn DocumentService>>,
    Extension(principal): Extension<Principal>,
    Path((application_id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let application_id = parse_id(&application_id, "application")?;
    Ok(Json(service.list_for_application(&principal, application_id).await?))
}

pub async fn review_document_handler(
    State(service): State<Arc<dyn DocumentService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<ReviewDocumentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "document")?;
    payload.validate()?;
    let document = service.review(&principal, id, payload.status, payload.remarks).await?;
    Ok(Json(document))
}
