use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use crate::dto::dashboard_dto::{
    ApplicantDashboard, DashboardSummary, PanelistDashboard, StaffDashboard, StatusCount, SupervisorDashboard,
};
use crate::model::application_form::ApplicationStatus;
use crate::model::document_upload::DocumentStatus;
use crate::model::interview::InterviewStatus;
use crate::model::principal::Principal;
use crate::model::user::UserRole;
use crate::service::application_service::ApplicationService;
use crate::service::document_service::DocumentService;
use crate::service::evaluation_service::EvaluationService;
use crate::service::interview_service::InterviewService;
use crate::service::notification_service::NotificationService;
use crate::service::personality_test_service::PersonalityTestService;
use crate::util::error::ServiceError;

pub const APPLICANT_TOTAL_STEPS: u8 = 5;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn summary(&self, principal: &Principal) -> Result<DashboardSummary, ServiceError>;
}

pub struct DashboardServiceImpl {
    pub application_service: Arc<dyn ApplicationService>,
    pub document_service: Arc<dyn DocumentService>,
    pub personality_test_service: Arc<dyn PersonalityTestService>,
    pub interview_service: Arc<dyn InterviewService>,
    pub evaluation_service: Arc<dyn EvaluationService>,
    pub notification_service: Arc<dyn NotificationService>,
}

impl DashboardServiceImpl {
    async fn applicant(&self, principal: &Principal, unread: u64) -> Result<ApplicantDashboard, ServiceError> {
        let application = self.application_service.find_by_applicant(principal.user_id).await?;
        let personality_test_completed = self.personality_test_service.has_completed(principal.user_id).await?;
        let upcoming_interview = self.interview_service.upcoming_for_applicant(principal.user_id).await?;

        let mut dashboard = ApplicantDashboard {
            application_id: None,
            status: None,
            status_label: None,
            step: 0,
            total_steps: APPLICANT_TOTAL_STEPS,
            documents_uploaded: 0,
            documents_verified: 0,
            personality_test_completed,
            upcoming_interview,
            unread_notifications: unread,
        };
        if let Some(application) = application {
            dashboard.application_id = application.id;
            dashboard.status = Some(application.status);
            dashboard.status_label = Some(application.status.label().to_string());
            dashboard.step = application.status.dashboard_step();
            dashboard.documents_uploaded = self.document_service.count(application.id, None).await?;
            dashboard.documents_verified = self
                .document_service
                .count(application.id, Some(DocumentStatus::Verified))
                .await?;
        }
        Ok(dashboard)
    }

    async fn staff(&self, unread: u64) -> Result<StaffDashboard, ServiceError> {
        let mut by_status = Vec::with_capacity(ApplicationStatus::ALL.len());
        for status in ApplicationStatus::ALL {
            by_status.push(StatusCount {
                status,
                label: status.label().to_string(),
                count: self.application_service.count_by_status(Some(status)).await?,
            });
        }
        Ok(StaffDashboard {
            total_applications: by_status.iter().map(|s| s.count).sum(),
            by_status,
            pending_document_reviews: self.document_service.count(None, Some(DocumentStatus::Pending)).await?,
            scheduled_interviews: self.interview_service.count(None, InterviewStatus::Scheduled).await?,
            unread_notifications: unread,
        })
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id, role = %principal.role))]
    async fn summary(&self, principal: &Principal) -> Result<DashboardSummary, ServiceError> {
        let unread = self.notification_service.unread_count(principal.user_id).await?;
        let summary = match principal.role {
            UserRole::Applicant => DashboardSummary::Applicant(self.applicant(principal, unread).await?),
            UserRole::OasStaff => DashboardSummary::OasStaff(self.staff(unread).await?),
            UserRole::Panelist => DashboardSummary::Panelist(PanelistDashboard {
                upcoming_interviews: self.interview_service.upcoming_for_panelist(principal.user_id).await?,
                completed_interviews: self
                    .interview_service
                    .count(Some(principal.user_id), InterviewStatus::Completed)
                    .await?,
                unread_notifications: unread,
            }),
            UserRole::NasSupervisor => DashboardSummary::NasSupervisor(SupervisorDashboard {
                evaluations_submitted: self.evaluation_service.count_by_supervisor(principal.user_id).await?,
                approved_scholars: self.application_service.count_by_status(Some(ApplicationStatus::Approved)).await?,
                unread_notifications: unread,
            }),
        };
        Ok(summary)
    }
}
