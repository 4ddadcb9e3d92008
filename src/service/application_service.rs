use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::dto::application_dto::{ApplicationFormRequest, ApplicationPage};
use crate::model::activity_log::{ActivityAction, ApplicationActivityLog};
use crate::model::application_form::{ApplicationForm, ApplicationStatus};
use crate::model::notification::NotificationKind;
use crate::model::principal::Principal;
use crate::model::role::Permission;
use crate::repository::{Page, SharedRepository, SortOrder};
use crate::service::notification_service::NotificationService;
use crate::service::{filter_value, now_rfc3339};
use crate::util::error::ServiceError;

#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn submit(&self, principal: &Principal, request: ApplicationFormRequest) -> Result<ApplicationForm, ServiceError>;
    async fn get_own(&self, principal: &Principal) -> Result<ApplicationForm, ServiceError>;
    async fn get(&self, principal: &Principal, id: ObjectId) -> Result<ApplicationForm, ServiceError>;
    /// Lookup without an access check, for other services.
    async fn find_by_id(&self, id: ObjectId) -> Result<ApplicationForm, ServiceError>;
    async fn find_by_applicant(&self, applicant_id: ObjectId) -> Result<Option<ApplicationForm>, ServiceError>;
    async fn list(&self, principal: &Principal, status: Option<ApplicationStatus>, page: Page) -> Result<ApplicationPage, ServiceError>;
    async fn update(&self, principal: &Principal, id: ObjectId, request: ApplicationFormRequest) -> Result<ApplicationForm, ServiceError>;
    async fn update_status(&self, principal: &Principal, id: ObjectId, status: ApplicationStatus, remarks: Option<String>) -> Result<ApplicationForm, ServiceError>;
    async fn list_activity(&self, principal: &Principal, id: ObjectId) -> Result<Vec<ApplicationActivityLog>, ServiceError>;
    async fn count_by_status(&self, status: Option<ApplicationStatus>) -> Result<u64, ServiceError>;

    /// Moves the application to `to`, logging and notifying the applicant.
    /// A change to the current status is a no-op.
    async fn change_status(&self, actor: &Principal, application: ApplicationForm, to: ApplicationStatus, remarks: Option<String>) -> Result<ApplicationForm, ServiceError>;
    async fn record_activity(
        &self,
        actor: &Principal,
        application_id: ObjectId,
        action: ActivityAction,
        transition: Option<(ApplicationStatus, ApplicationStatus)>,
        remarks: Option<String>,
    ) -> Result<ApplicationActivityLog, ServiceError>;
}

pub struct ApplicationServiceImpl {
    pub application_repo: SharedRepository<ApplicationForm>,
    pub activity_repo: SharedRepository<ApplicationActivityLog>,
    pub notification_service: Arc<dyn NotificationService>,
}

impl ApplicationServiceImpl {
    pub fn new(
        application_repo: SharedRepository<ApplicationForm>,
        activity_repo: SharedRepository<ApplicationActivityLog>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self { application_repo, activity_repo, notification_service }
    }

    fn apply(form: &mut ApplicationForm, request: ApplicationFormRequest) {
        form.personal = request.personal;
        form.family = request.family;
        form.education = request.education;
        form.organizations = request.organizations;
        form.references = request.references;
    }
}

fn application_id(form: &ApplicationForm) -> Result<ObjectId, ServiceError> {
    form.id.ok_or_else(|| ServiceError::InternalError("Application has no id".to_string()))
}

#[async_trait]
impl ApplicationService for ApplicationServiceImpl {
    #[instrument(skip(self, principal, request), fields(applicant_id = %principal.user_id))]
    async fn submit(&self, principal: &Principal, request: ApplicationFormRequest) -> Result<ApplicationForm, ServiceError> {
        principal.require(Permission::SubmitApplication)?;
        if self.find_by_applicant(principal.user_id).await?.is_some() {
            warn!("Applicant already has an application");
            return Err(ServiceError::Conflict("An application was already submitted".to_string()));
        }

        let form = ApplicationForm {
            id: None,
            applicant_id: principal.user_id,
            personal: request.personal,
            family: request.family,
            education: request.education,
            organizations: request.organizations,
            references: request.references,
            status: ApplicationStatus::Pending,
            status_remarks: None,
            submitted_at: Some(now_rfc3339()),
            created_at: None,
            updated_at: None,
        };
        let res = self.application_repo.insert(form).await;
        match &res {
            Ok(_) => info!("Application submitted"),
            Err(e) => error!("Failed to submit application: {e}"),
        }
        let created = res?;

        let id = application_id(&created)?;
        self.record_activity(principal, id, ActivityAction::Submitted, None, None).await?;
        Ok(created)
    }

    async fn get_own(&self, principal: &Principal) -> Result<ApplicationForm, ServiceError> {
        self.find_by_applicant(principal.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No application submitted yet".to_string()))
    }

    async fn get(&self, principal: &Principal, id: ObjectId) -> Result<ApplicationForm, ServiceError> {
        let form = self.application_repo.get_by_id(&id).await?;
        principal.require_owner_or(&form.applicant_id, Permission::ReviewApplications)?;
        Ok(form)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<ApplicationForm, ServiceError> {
        Ok(self.application_repo.get_by_id(&id).await?)
    }

    async fn find_by_applicant(&self, applicant_id: ObjectId) -> Result<Option<ApplicationForm>, ServiceError> {
        Ok(self.application_repo.find_one(doc! { "applicant_id": applicant_id }).await?)
    }

    #[instrument(skip(self, principal))]
    async fn list(&self, principal: &Principal, status: Option<ApplicationStatus>, page: Page) -> Result<ApplicationPage, ServiceError> {
        principal.require(Permission::ReviewApplications)?;
        let mut filter = doc! {};
        if let Some(status) = status {
            filter.insert("status", filter_value(&status)?);
        }
        let total = self.application_repo.count(filter.clone()).await?;
        let items = self.application_repo.find_many(filter, SortOrder::NewestFirst, Some(page)).await?;
        Ok(ApplicationPage { items, total, page: page.page, limit: page.limit })
    }

    #[instrument(skip(self, principal, request), fields(application_id = %id))]
    async fn update(&self, principal: &Principal, id: ObjectId, request: ApplicationFormRequest) -> Result<ApplicationForm, ServiceError> {
        let mut form = self.get(principal, id).await?;
        let is_reviewer = principal.has(Permission::ReviewApplications);
        if !is_reviewer && !form.status.is_editable_by_applicant() {
            return Err(ServiceError::Conflict(format!(
                "Application can no longer be edited (status: {})",
                form.status
            )));
        }

        Self::apply(&mut form, request);
        let updated = self.application_repo.replace(form).await?;
        info!("Application updated");
        self.record_activity(principal, id, ActivityAction::Updated, None, None).await?;
        Ok(updated)
    }

    #[instrument(skip(self, principal, remarks), fields(application_id = %id, status = %status))]
    async fn update_status(&self, principal: &Principal, id: ObjectId, status: ApplicationStatus, remarks: Option<String>) -> Result<ApplicationForm, ServiceError> {
        principal.require(Permission::ReviewApplications)?;
        let form = self.application_repo.get_by_id(&id).await?;
        self.change_status(principal, form, status, remarks).await
    }

    async fn list_activity(&self, principal: &Principal, id: ObjectId) -> Result<Vec<ApplicationActivityLog>, ServiceError> {
        self.get(principal, id).await?;
        Ok(self
            .activity_repo
            .find_many(doc! { "application_id": id }, SortOrder::OldestFirst, None)
            .await?)
    }

    async fn count_by_status(&self, status: Option<ApplicationStatus>) -> Result<u64, ServiceError> {
        let filter = match status {
            Some(status) => doc! { "status": filter_value(&status)? },
            None => doc! {},
        };
        Ok(self.application_repo.count(filter).await?)
    }

    #[instrument(skip(self, actor, application, remarks), fields(from = %application.status, to = %to))]
    async fn change_status(&self, actor: &Principal, mut application: ApplicationForm, to: ApplicationStatus, remarks: Option<String>) -> Result<ApplicationForm, ServiceError> {
        let from = application.status;
        if from == to {
            info!("Application already has the requested status");
            return Ok(application);
        }
        let id = application_id(&application)?;
        if from.is_final() {
            warn!("Reopening an application with a final decision");
        }

        application.status = to;
        application.status_remarks = remarks.clone();
        let updated = self.application_repo.replace(application).await?;
        info!("Application status changed");

        self.record_activity(actor, id, ActivityAction::StatusChanged, Some((from, to)), remarks.clone()).await?;

        let mut message = format!("Your application status is now: {}.", to.label());
        if let Some(remarks) = remarks.as_deref().filter(|r| !r.trim().is_empty()) {
            message.push_str(&format!(" Remarks: {}", remarks));
        }
        if let Err(e) = self
            .notification_service
            .notify(updated.applicant_id, NotificationKind::StatusChange, "Application status updated", &message)
            .await
        {
            error!("Failed to notify applicant of status change: {e}");
        }
        Ok(updated)
    }

    async fn record_activity(
        &self,
        actor: &Principal,
        application_id: ObjectId,
        action: ActivityAction,
        transition: Option<(ApplicationStatus, ApplicationStatus)>,
        remarks: Option<String>,
    ) -> Result<ApplicationActivityLog, ServiceError> {
        let entry = ApplicationActivityLog {
            id: None,
            application_id,
            actor_id: actor.user_id,
            actor_role: actor.role,
            action,
            from_status: transition.map(|(from, _)| from),
            to_status: transition.map(|(_, to)| to),
            remarks,
            created_at: None,
            updated_at: None,
        };
        let res = self.activity_repo.insert(entry).await;
        if let Err(e) = &res {
            error!("Failed to record application activity: {e}");
        }
        Ok(res?)
    }
}

