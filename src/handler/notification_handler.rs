use axum::{extract::{Json, Path, Query, State}, response::IntoResponse, Extension};
use serde::Deserialize;
use std::sync::Arc;

use crate::handler::parse_id;
use crate::model::principal::Principal;
use crate::service::notification_service::NotificationService;
use crate::util::error::HandlerError;

#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list_notifications_handler(
    State(service): State<Arc<dyn NotificationService>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListNotificationsQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_for_user(principal.user_id, params.unread_only).await?))
}

pub async fn mark_read_handler(
    State(service): State<Arc<dyn NotificationService>>,
    Extension(principal): Extension<Principal>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id, "notification")?;
    Ok(Json(service.mark_read(principal.user_id, id).await?))
}
