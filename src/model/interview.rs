use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::impl_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewRecommendation {
    Recommended,
    NotRecommended,
    ForFurtherReview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub application_id: ObjectId,
    pub applicant_id: ObjectId,
    pub panelist_id: ObjectId,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub status: InterviewStatus,
    pub recommendation: Option<InterviewRecommendation>,
    pub remarks: Option<String>,
    pub scheduled_by: ObjectId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(Interview, "interviews");
