use axum::{extract::{Json, Path, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::personality_test_dto::{CreateTemplateRequest, StartTestRequest, SubmitAnswersRequest};
use crate::handler::parse_id;
use crate::model::principal::Principal;
use crate::service::personality_test_service::PersonalityTestService;
use crate::util::error::HandlerError;

pub async fn create_template_handler(
    State(service): State<Arc<dyn PersonalityTestService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let template = service.create_template(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn list_templates_handler(
    State(service): State<Arc<dyn PersonalityTestService>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_templates().await?))
}

pub async fn start_test_handler(
    State(service): State<Arc<dyn PersonalityTestService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<StartTestRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let template_id = parse_id(&payload.template_id, "template")?;
    let test = service.start(&principal, template_id).await?;
    Ok((StatusCode::CREATED, Json(test)))
}

pub async fn submit_answers_handler(
    State(service): State<Arc<dyn PersonalityTestService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "personality test")?;
    payload.validate()?;
    Ok(Json(service.submit_answers(&principal, id, payload.answers).await?))
}

pub async fn get_test_handler(
    State(service): State<Arc<dyn PersonalityTestService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "personality test")?;
    Ok(Json(service.get_result(&principal, id).await?))
}
