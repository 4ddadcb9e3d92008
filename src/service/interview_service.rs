use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::dto::interview_dto::ScheduleInterviewRequest;
use crate::model::activity_log::ActivityAction;
use crate::model::application_form::ApplicationStatus;
use crate::model::interview::{Interview, InterviewRecommendation, InterviewStatus};
use crate::model::notification::NotificationKind;
use crate::model::principal::Principal;
use crate::model::role::Permission;
use crate::model::user::{User, UserRole};
use crate::repository::{SharedRepository, SortOrder};
use crate::service::application_service::ApplicationService;
use crate::service::notification_service::NotificationService;
use crate::service::{filter_value, parse_object_id};
use crate::util::error::ServiceError;

#[async_trait]
pub trait InterviewService: Send + Sync {
    async fn schedule(&self, principal: &Principal, request: ScheduleInterviewRequest) -> Result<Interview, ServiceError>;
    /// Panelists see their assignments, schedulers see everything, applicants their own.
    async fn list(&self, principal: &Principal) -> Result<Vec<Interview>, ServiceError>;
    async fn recommend(&self, principal: &Principal, interview_id: ObjectId, recommendation: InterviewRecommendation, remarks: Option<String>) -> Result<Interview, ServiceError>;
    async fn cancel(&self, principal: &Principal, interview_id: ObjectId) -> Result<Interview, ServiceError>;
    async fn upcoming_for_applicant(&self, applicant_id: ObjectId) -> Result<Option<Interview>, ServiceError>;
    async fn upcoming_for_panelist(&self, panelist_id: ObjectId) -> Result<Vec<Interview>, ServiceError>;
    async fn count(&self, panelist_id: Option<ObjectId>, status: InterviewStatus) -> Result<u64, ServiceError>;
}

pub struct InterviewServiceImpl {
    pub interview_repo: SharedRepository<Interview>,
    pub user_repo: SharedRepository<User>,
    pub application_service: Arc<dyn ApplicationService>,
    pub notification_service: Arc<dyn NotificationService>,
}

impl InterviewServiceImpl {
    pub fn new(
        interview_repo: SharedRepository<Interview>,
        user_repo: SharedRepository<User>,
        application_service: Arc<dyn ApplicationService>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self { interview_repo, user_repo, application_service, notification_service }
    }

    async fn scheduled(&self, filter: bson::Document) -> Result<Vec<Interview>, ServiceError> {
        let mut filter = filter;
        filter.insert("status", filter_value(&InterviewStatus::Scheduled)?);
        let now = Utc::now();
        let mut interviews: Vec<Interview> = self
            .interview_repo
            .find_many(filter, SortOrder::OldestFirst, None)
            .await?
            .into_iter()
            .filter(|i| i.scheduled_at >= now)
            .collect();
        interviews.sort_by_key(|i| i.scheduled_at);
        Ok(interviews)
    }

    async fn notify(&self, user_id: ObjectId, title: &str, message: &str) {
        if let Err(e) = self.notification_service.notify(user_id, NotificationKind::Interview, title, message).await {
            error!("Failed to store interview notification: {e}");
        }
    }

    async fn load_scheduled(&self, interview_id: ObjectId) -> Result<Interview, ServiceError> {
        let interview = self.interview_repo.get_by_id(&interview_id).await?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(ServiceError::Conflict(format!(
                "Interview is no longer scheduled (status: {:?})",
                interview.status
            )));
        }
        Ok(interview)
    }
}

#[async_trait]
impl InterviewService for InterviewServiceImpl {
    #[instrument(skip(self, principal, request), fields(application_id = %request.application_id, panelist_id = %request.panelist_id))]
    async fn schedule(&self, principal: &Principal, request: ScheduleInterviewRequest) -> Result<Interview, ServiceError> {
        principal.require(Permission::ScheduleInterviews)?;
        let application_id = parse_object_id(&request.application_id, "application")?;
        let panelist_id = parse_object_id(&request.panelist_id, "panelist")?;

        if request.scheduled_at <= Utc::now() {
            return Err(ServiceError::InvalidInput("Interview must be scheduled in the future".to_string()));
        }
        match self.user_repo.find_by_id(&panelist_id).await? {
            Some(user) if user.role == UserRole::Panelist && user.active => {}
            _ => return Err(ServiceError::InvalidInput("Assigned user is not an active panelist".to_string())),
        }

        let application = self.application_service.find_by_id(application_id).await?;
        if application.status.is_final() {
            return Err(ServiceError::Conflict("Application already has a final decision".to_string()));
        }
        let open = self
            .interview_repo
            .count(doc! { "application_id": application_id, "status": filter_value(&InterviewStatus::Scheduled)? })
            .await?;
        if open > 0 {
            warn!("Application already has a scheduled interview");
            return Err(ServiceError::Conflict("Application already has a scheduled interview".to_string()));
        }

        let interview = Interview {
            id: None,
            application_id,
            applicant_id: application.applicant_id,
            panelist_id,
            scheduled_at: request.scheduled_at,
            location: request.location,
            status: InterviewStatus::Scheduled,
            recommendation: None,
            remarks: None,
            scheduled_by: principal.user_id,
            created_at: None,
            updated_at: None,
        };
        let res = self.interview_repo.insert(interview).await;
        match &res {
            Ok(_) => info!("Interview scheduled"),
            Err(e) => error!("Failed to schedule interview: {e}"),
        }
        let created = res?;

        let when = created.scheduled_at.format("%Y-%m-%d %H:%M UTC").to_string();
        self.application_service
            .record_activity(principal, application_id, ActivityAction::InterviewScheduled, None, Some(format!("{} at {}", when, created.location)))
            .await?;
        self.application_service
            .change_status(principal, application, ApplicationStatus::InterviewScheduled, None)
            .await?;
        self.notify(
            created.applicant_id,
            "Interview scheduled",
            &format!("Your interview is on {} at {}.", when, created.location),
        )
        .await;
        self.notify(
            created.panelist_id,
            "New interview assignment",
            &format!("You are assigned an interview on {} at {}.", when, created.location),
        )
        .await;
        Ok(created)
    }

    async fn list(&self, principal: &Principal) -> Result<Vec<Interview>, ServiceError> {
        let filter = if principal.has(Permission::ScheduleInterviews) {
            doc! {}
        } else if principal.role == UserRole::Panelist {
            doc! { "panelist_id": principal.user_id }
        } else if principal.role == UserRole::Applicant {
            doc! { "applicant_id": principal.user_id }
        } else {
            return Err(ServiceError::Forbidden("Not allowed to list interviews".to_string()));
        };
        let mut interviews = self.interview_repo.find_many(filter, SortOrder::OldestFirst, None).await?;
        interviews.sort_by_key(|i| i.scheduled_at);
        Ok(interviews)
    }

    #[instrument(skip(self, principal, remarks), fields(interview_id = %interview_id, recommendation = ?recommendation))]
    async fn recommend(&self, principal: &Principal, interview_id: ObjectId, recommendation: InterviewRecommendation, remarks: Option<String>) -> Result<Interview, ServiceError> {
        principal.require(Permission::RecommendApplicants)?;
        let mut interview = self.load_scheduled(interview_id).await?;
        if interview.panelist_id != principal.user_id {
            return Err(ServiceError::Forbidden("Only the assigned panelist can recommend".to_string()));
        }

        interview.status = InterviewStatus::Completed;
        interview.recommendation = Some(recommendation);
        interview.remarks = remarks.clone();
        let updated = self.interview_repo.replace(interview).await?;
        info!("Interview recommendation recorded");

        self.application_service
            .record_activity(principal, updated.application_id, ActivityAction::InterviewRecommended, None, remarks)
            .await?;
        let application = self.application_service.find_by_id(updated.application_id).await?;
        if application.status.is_final() {
            warn!(status = %application.status, "Application already decided, status left unchanged");
        } else {
            self.application_service
                .change_status(principal, application, ApplicationStatus::InterviewCompleted, None)
                .await?;
        }
        Ok(updated)
    }

    #[instrument(skip(self, principal), fields(interview_id = %interview_id))]
    async fn cancel(&self, principal: &Principal, interview_id: ObjectId) -> Result<Interview, ServiceError> {
        principal.require(Permission::ScheduleInterviews)?;
        let mut interview = self.load_scheduled(interview_id).await?;
        interview.status = InterviewStatus::Cancelled;
        let cancelled = self.interview_repo.replace(interview).await?;
        info!("Interview cancelled");

        let when = cancelled.scheduled_at.format("%Y-%m-%d %H:%M UTC").to_string();
        let message = format!("The interview on {} at {} was cancelled.", when, cancelled.location);
        self.notify(cancelled.applicant_id, "Interview cancelled", &message).await;
        self.notify(cancelled.panelist_id, "Interview cancelled", &message).await;
        Ok(cancelled)
    }

    async fn upcoming_for_applicant(&self, applicant_id: ObjectId) -> Result<Option<Interview>, ServiceError> {
        Ok(self.scheduled(doc! { "applicant_id": applicant_id }).await?.into_iter().next())
    }

    async fn upcoming_for_panelist(&self, panelist_id: ObjectId) -> Result<Vec<Interview>, ServiceError> {
        self.scheduled(doc! { "panelist_id": panelist_id }).await
    }

    async fn count(&self, panelist_id: Option<ObjectId>, status: InterviewStatus) -> Result<u64, ServiceError> {
        let mut filter = doc! { "status": filter_value(&status)? };
        if let Some(panelist_id) = panelist_id {
            filter.insert("panelist_id", panelist_id);
        }
        Ok(self.interview_repo.count(filter).await?)
    }
}
