use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::model::interview::InterviewRecommendation;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleInterviewRequest {
    #[validate(length(equal = 24))]
    pub application_id: String,
    #[validate(length(equal = 24))]
    pub panelist_id: String,
    pub scheduled_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 256))]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecommendationRequest {
    pub recommendation: InterviewRecommendation,
    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}
