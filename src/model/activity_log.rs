use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::application_form::ApplicationStatus;
use crate::model::impl_entity;
use crate::model::user::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Submitted,
    Updated,
    StatusChanged,
    DocumentUploaded,
    DocumentReviewed,
    InterviewScheduled,
    InterviewRecommended,
}

/// Append-only audit entry for an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationActivityLog {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub application_id: ObjectId,
    pub actor_id: ObjectId,
    pub actor_role: UserRole,
    pub action: ActivityAction,
    pub from_status: Option<ApplicationStatus>,
    pub to_status: Option<ApplicationStatus>,
    pub remarks: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(ApplicationActivityLog, "application_activity_logs");
