use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::impl_entity;

/// Supervisor rubric, each criterion rated 1.00 to 5.00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EvaluationRatings {
    #[validate(range(min = 1.0, max = 5.0))]
    pub attendance: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub punctuality: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub quality_of_work: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub attitude: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub initiative: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub cooperation: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl EvaluationRatings {
    /// Ratings are stored with two decimal places.
    pub fn rounded(&self) -> Self {
        EvaluationRatings {
            attendance: round2(self.attendance),
            punctuality: round2(self.punctuality),
            quality_of_work: round2(self.quality_of_work),
            attitude: round2(self.attitude),
            initiative: round2(self.initiative),
            cooperation: round2(self.cooperation),
        }
    }

    pub fn overall(&self) -> f64 {
        let values = [
            self.attendance,
            self.punctuality,
            self.quality_of_work,
            self.attitude,
            self.initiative,
            self.cooperation,
        ];
        round2(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationRecommendation {
    Retain,
    Probation,
    Terminate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub scholar_id: ObjectId,
    pub supervisor_id: ObjectId,
    pub semester: String,
    pub academic_year: String,
    pub ratings: EvaluationRatings,
    pub overall_rating: f64,
    pub remarks: Option<String>,
    pub recommendation: EvaluationRecommendation,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(Evaluation, "evaluations");
