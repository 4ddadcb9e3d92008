use axum::{extract::{Json, Path, Query, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::evaluation_dto::{ListEvaluationsQuery, SubmitEvaluationRequest};
use crate::handler::parse_id;
use crate::model::principal::Principal;
use crate::service::evaluation_service::EvaluationService;
use crate::util::error::HandlerError;

pub async fn submit_evaluation_handler(
    State(service): State<Arc<dyn EvaluationService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SubmitEvaluationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let evaluation = service.submit(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

pub async fn list_evaluations_handler(
    State(service): State<Arc<dyn EvaluationService>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListEvaluationsQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let scholar_id = params
        .scholar_id
        .as_deref()
        .map(|id| parse_id(id, "scholar"))
        .transpose()?;
    Ok(Json(service.list(&principal, scholar_id).await?))
}

pub async fn get_evaluation_handler(
    State(service): State<Arc<dyn EvaluationService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "evaluation")?;
    Ok(Json(service.get(&principal, id).await?))
}
