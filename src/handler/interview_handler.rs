use axum::{extract::{Json, Path, State}, http::StatusCode, response::IntoResponse, Extension};
use std::sync::Arc;
use validator::Validate;

use crate::dto::interview_dto::{RecommendationRequest, ScheduleInterviewRequest};
use crate::handler::parse_id;
use crate::model::principal::Principal;
use crate::service::interview_service::InterviewService;
use crate::util::error::HandlerError;

pub async fn schedule_interview_handler(
    State(service): State<Arc<dyn InterviewService>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ScheduleInterviewRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate()?;
    let interview = service.schedule(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn list_interviews_handler(
    State(service): State<Arc<dyn InterviewService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list(&principal).await?))
}

pub async fn recommend_handler(
    State(service): State<Arc<dyn InterviewService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "interview")?;
    payload.validate()?;
    let interview = service.recommend(&principal, id, payload.recommendation, payload.remarks).await?;
    Ok(Json(interview))
}

pub async fn cancel_interview_handler(
    State(service): State<Arc<dyn InterviewService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "interview")?;
    Ok(Json(service.cancel(&principal, id).await?))
}
