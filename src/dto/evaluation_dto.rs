use serde::Deserialize;
use validator::Validate;

use crate::model::evaluation::{EvaluationRatings, EvaluationRecommendation};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitEvaluationRequest {
    #[validate(length(equal = 24))]
    pub scholar_id: String,
    #[validate(length(min = 1, max = 32))]
    pub semester: String,
    /// e.g. `2025-2026`
    #[validate(length(equal = 9))]
    pub academic_year: String,
    #[validate(nested)]
    pub ratings: EvaluationRatings,
    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
    pub recommendation: EvaluationRecommendation,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListEvaluationsQuery {
    pub scholar_id: Option<String>,
}
