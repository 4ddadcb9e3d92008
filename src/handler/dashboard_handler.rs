use axum::{extract::{Json, State}, response::IntoResponse, Extension};
use std::sync::Arc;

use crate::model::principal::Principal;
use crate::service::dashboard_service::DashboardService;
use crate::util::error::HandlerError;

pub async fn dashboard_handler(
    State(service): State<Arc<dyn DashboardService>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.summary(&principal).await?))
}
