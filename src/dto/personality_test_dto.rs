use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::personality_test::{PersonalityTest, PersonalityTestAnswer, Question};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartTestRequest {
    #[validate(length(equal = 24))]
    pub template_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerInput {
    pub question_number: u32,
    #[validate(length(min = 1, max = 2000))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(length(min = 1), nested)]
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalityTestResult {
    pub test: PersonalityTest,
    pub answers: Vec<PersonalityTestAnswer>,
    pub total_questions: usize,
    pub answered: usize,
}
