use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::dto::evaluation_dto::SubmitEvaluationRequest;
use crate::model::application_form::ApplicationStatus;
use crate::model::evaluation::Evaluation;
use crate::model::principal::Principal;
use crate::model::role::Permission;
use crate::model::user::{User, UserRole};
use crate::repository::{SharedRepository, SortOrder};
use crate::service::application_service::ApplicationService;
use crate::service::parse_object_id;
use crate::util::error::ServiceError;

#[async_trait]
pub trait EvaluationService: Send + Sync {
    async fn submit(&self, principal: &Principal, request: SubmitEvaluationRequest) -> Result<Evaluation, ServiceError>;
    async fn list(&self, principal: &Principal, scholar_id: Option<ObjectId>) -> Result<Vec<Evaluation>, ServiceError>;
    async fn get(&self, principal: &Principal, id: ObjectId) -> Result<Evaluation, ServiceError>;
    async fn count_by_supervisor(&self, supervisor_id: ObjectId) -> Result<u64, ServiceError>;
}

pub struct EvaluationServiceImpl {
    pub evaluation_repo: SharedRepository<Evaluation>,
    pub user_repo: SharedRepository<User>,
    pub application_service: Arc<dyn ApplicationService>,
}

impl EvaluationServiceImpl {
    pub fn new(
        evaluation_repo: SharedRepository<Evaluation>,
        user_repo: SharedRepository<User>,
        application_service: Arc<dyn ApplicationService>,
    ) -> Self {
        Self { evaluation_repo, user_repo, application_service }
    }

    /// Scholars are applicants whose application was approved.
    async fn ensure_scholar(&self, scholar_id: ObjectId) -> Result<(), ServiceError> {
        match self.user_repo.find_by_id(&scholar_id).await? {
            Some(user) if user.role == UserRole::Applicant => {}
            Some(_) => return Err(ServiceError::InvalidInput("Evaluated user is not a scholar".to_string())),
            None => return Err(ServiceError::NotFound(format!("Scholar not found: {}", scholar_id))),
        }
        let approved = self
            .application_service
            .find_by_applicant(scholar_id)
            .await?
            .is_some_and(|application| application.status == ApplicationStatus::Approved);
        if !approved {
            return Err(ServiceError::InvalidInput("Scholar has no approved application".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EvaluationService for EvaluationServiceImpl {
    #[instrument(skip(self, principal, request), fields(supervisor_id = %principal.user_id, scholar_id = %request.scholar_id))]
    async fn submit(&self, principal: &Principal, request: SubmitEvaluationRequest) -> Result<Evaluation, ServiceError> {
        principal.require(Permission::SubmitEvaluations)?;
        let scholar_id = parse_object_id(&request.scholar_id, "scholar")?;
        self.ensure_scholar(scholar_id).await?;

        let duplicate = self
            .evaluation_repo
            .find_one(doc! {
                "scholar_id": scholar_id,
                "semester": request.semester.as_str(),
                "academic_year": request.academic_year.as_str(),
            })
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Scholar already evaluated for {} {}",
                request.semester, request.academic_year
            )));
        }

        let ratings = request.ratings.rounded();
        let evaluation = Evaluation {
            id: None,
            scholar_id,
            supervisor_id: principal.user_id,
            semester: request.semester,
            academic_year: request.academic_year,
            overall_rating: ratings.overall(),
            ratings,
            remarks: request.remarks,
            recommendation: request.recommendation,
            created_at: None,
            updated_at: None,
        };
        let res = self.evaluation_repo.insert(evaluation).await;
        match &res {
            Ok(e) => info!(overall = e.overall_rating, "Evaluation submitted"),
            Err(e) => error!("Failed to submit evaluation: {e}"),
        }
        Ok(res?)
    }

    async fn list(&self, principal: &Principal, scholar_id: Option<ObjectId>) -> Result<Vec<Evaluation>, ServiceError> {
        principal.require(Permission::ViewEvaluations)?;
        let filter = match scholar_id {
            Some(id) => doc! { "scholar_id": id },
            None => doc! {},
        };
        Ok(self.evaluation_repo.find_many(filter, SortOrder::NewestFirst, None).await?)
    }

    async fn get(&self, principal: &Principal, id: ObjectId) -> Result<Evaluation, ServiceError> {
        principal.require(Permission::ViewEvaluations)?;
        Ok(self.evaluation_repo.get_by_id(&id).await?)
    }

    async fn count_by_supervisor(&self, supervisor_id: ObjectId) -> Result<u64, ServiceError> {
        Ok(self.evaluation_repo.count(doc! { "supervisor_id": supervisor_id }).await?)
    }
}
