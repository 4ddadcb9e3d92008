use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

use crate::dto::personality_test_dto::{AnswerInput, CreateTemplateRequest, PersonalityTestResult};
use crate::model::personality_test::{
    PersonalityTest, PersonalityTestAnswer, PersonalityTestTemplate, TestStatus,
};
use crate::model::principal::Principal;
use crate::model::role::Permission;
use crate::repository::{SharedRepository, SortOrder};
use crate::service::{filter_value, now_rfc3339};
use crate::util::error::ServiceError;

#[async_trait]
pub trait PersonalityTestService: Send + Sync {
    async fn create_template(&self, principal: &Principal, request: CreateTemplateRequest) -> Result<PersonalityTestTemplate, ServiceError>;
    async fn list_templates(&self) -> Result<Vec<PersonalityTestTemplate>, ServiceError>;
    /// Starting a template twice resumes the unfinished test.
    async fn start(&self, principal: &Principal, template_id: ObjectId) -> Result<PersonalityTest, ServiceError>;
    async fn submit_answers(&self, principal: &Principal, test_id: ObjectId, answers: Vec<AnswerInput>) -> Result<PersonalityTestResult, ServiceError>;
    async fn get_result(&self, principal: &Principal, test_id: ObjectId) -> Result<PersonalityTestResult, ServiceError>;
    async fn has_completed(&self, applicant_id: ObjectId) -> Result<bool, ServiceError>;
}

pub struct PersonalityTestServiceImpl {
    pub template_repo: SharedRepository<PersonalityTestTemplate>,
    pub test_repo: SharedRepository<PersonalityTest>,
    pub answer_repo: SharedRepository<PersonalityTestAnswer>,
}

impl PersonalityTestServiceImpl {
    pub fn new(
        template_repo: SharedRepository<PersonalityTestTemplate>,
        test_repo: SharedRepository<PersonalityTest>,
        answer_repo: SharedRepository<PersonalityTestAnswer>,
    ) -> Self {
        Self { template_repo, test_repo, answer_repo }
    }

    async fn result_for(&self, test: PersonalityTest) -> Result<PersonalityTestResult, ServiceError> {
        let test_id = test.id.ok_or_else(|| ServiceError::InternalError("Test has no id".to_string()))?;
        let template = self.template_repo.get_by_id(&test.template_id).await?;
        let mut answers = self
            .answer_repo
            .find_many(doc! { "test_id": test_id }, SortOrder::OldestFirst, None)
            .await?;
        answers.sort_by_key(|a| a.question_number);
        Ok(PersonalityTestResult {
            total_questions: template.questions.len(),
            answered: answers.len(),
            test,
            answers,
        })
    }
}

#[async_trait]
impl PersonalityTestService for PersonalityTestServiceImpl {
    #[instrument(skip(self, principal, request), fields(title = %request.title))]
    async fn create_template(&self, principal: &Principal, request: CreateTemplateRequest) -> Result<PersonalityTestTemplate, ServiceError> {
        principal.require(Permission::ManagePersonalityTests)?;
        let mut numbers = HashSet::new();
        for question in &request.questions {
            if !numbers.insert(question.number) {
                return Err(ServiceError::InvalidInput(format!("Duplicate question number {}", question.number)));
            }
        }

        let mut questions = request.questions;
        questions.sort_by_key(|q| q.number);
        let template = PersonalityTestTemplate {
            id: None,
            title: request.title,
            description: request.description,
            questions,
            active: true,
            created_at: None,
            updated_at: None,
        };
        let created = self.template_repo.insert(template).await?;
        info!(questions = created.questions.len(), "Personality test template created");
        Ok(created)
    }

    async fn list_templates(&self) -> Result<Vec<PersonalityTestTemplate>, ServiceError> {
        Ok(self.template_repo.find_many(doc! { "active": true }, SortOrder::OldestFirst, None).await?)
    }

    #[instrument(skip(self, principal), fields(applicant_id = %principal.user_id, template_id = %template_id))]
    async fn start(&self, principal: &Principal, template_id: ObjectId) -> Result<PersonalityTest, ServiceError> {
        principal.require(Permission::TakePersonalityTest)?;
        let template = self.template_repo.get_by_id(&template_id).await?;
        if !template.active {
            return Err(ServiceError::InvalidInput("Personality test is no longer offered".to_string()));
        }

        let existing = self
            .test_repo
            .find_one(doc! { "applicant_id": principal.user_id, "template_id": template_id })
            .await?;
        if let Some(test) = existing {
            return match test.status {
                TestStatus::InProgress => {
                    info!("Resuming unfinished personality test");
                    Ok(test)
                }
                TestStatus::Completed => Err(ServiceError::Conflict("Personality test already completed".to_string())),
            };
        }

        let test = PersonalityTest {
            id: None,
            applicant_id: principal.user_id,
            template_id,
            status: TestStatus::InProgress,
            started_at: now_rfc3339(),
            completed_at: None,
            created_at: None,
            updated_at: None,
        };
        let created = self.test_repo.insert(test).await?;
        info!("Personality test started");
        Ok(created)
    }

    #[instrument(skip(self, principal, answers), fields(test_id = %test_id, count = answers.len()))]
    async fn submit_answers(&self, principal: &Principal, test_id: ObjectId, answers: Vec<AnswerInput>) -> Result<PersonalityTestResult, ServiceError> {
        let mut test = self.test_repo.get_by_id(&test_id).await?;
        if test.applicant_id != principal.user_id {
            return Err(ServiceError::Forbidden("Personality test belongs to another applicant".to_string()));
        }
        if test.status == TestStatus::Completed {
            return Err(ServiceError::Conflict("Personality test already completed".to_string()));
        }

        let template = self.template_repo.get_by_id(&test.template_id).await?;
        // Reject the whole batch before writing anything.
        for input in &answers {
            let question = template.question(input.question_number).ok_or_else(|| {
                ServiceError::InvalidInput(format!("Unknown question number {}", input.question_number))
            })?;
            if !question.accepts(&input.answer) {
                warn!(question = input.question_number, "Answer not among the options");
                return Err(ServiceError::InvalidInput(format!(
                    "Invalid answer for question {}",
                    input.question_number
                )));
            }
        }

        for input in answers {
            let existing = self
                .answer_repo
                .find_one(doc! { "test_id": test_id, "question_number": input.question_number })
                .await?;
            match existing {
                Some(mut answer) => {
                    answer.answer = input.answer;
                    self.answer_repo.replace(answer).await?;
                }
                None => {
                    self.answer_repo
                        .insert(PersonalityTestAnswer {
                            id: None,
                            test_id,
                            question_number: input.question_number,
                            answer: input.answer,
                            created_at: None,
                            updated_at: None,
                        })
                        .await?;
                }
            }
        }

        let answered = self.answer_repo.count(doc! { "test_id": test_id }).await?;
        if answered as usize >= template.questions.len() {
            test.status = TestStatus::Completed;
            test.completed_at = Some(now_rfc3339());
            test = self.test_repo.replace(test).await?;
            info!("Personality test completed");
        }
        self.result_for(test).await
    }

    async fn get_result(&self, principal: &Principal, test_id: ObjectId) -> Result<PersonalityTestResult, ServiceError> {
        let test = self.test_repo.get_by_id(&test_id).await?;
        principal.require_owner_or(&test.applicant_id, Permission::ManagePersonalityTests)?;
        self.result_for(test).await
    }

    async fn has_completed(&self, applicant_id: ObjectId) -> Result<bool, ServiceError> {
        let completed = self
            .test_repo
            .count(doc! { "applicant_id": applicant_id, "status": filter_value(&TestStatus::Completed)? })
            .await?;
        Ok(completed > 0)
    }
}
