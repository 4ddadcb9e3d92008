use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::dto::document_dto::RegisterDocumentRequest;
use crate::model::activity_log::ActivityAction;
use crate::model::document_upload::{DocumentStatus, DocumentUpload, ALLOWED_CONTENT_TYPES, MAX_DOCUMENT_SIZE};
use crate::model::notification::NotificationKind;
use crate::model::principal::Principal;
use crate::model::role::Permission;
use crate::repository::{SharedRepository, SortOrder};
use crate::service::application_service::ApplicationService;
use crate::service::notification_service::NotificationService;
use crate::service::{filter_value, now_rfc3339};
use crate::util::error::ServiceError;

#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Stores metadata for one document type, replacing an earlier upload of the same type.
    async fn register(&self, principal: &Principal, application_id: ObjectId, request: RegisterDocumentRequest) -> Result<DocumentUpload, ServiceError>;
    async fn list_for_application(&self, principal: &Principal, application_id: ObjectId) -> Result<Vec<DocumentUpload>, ServiceError>;
    async fn review(&self, principal: &Principal, document_id: ObjectId, status: DocumentStatus, remarks: Option<String>) -> Result<DocumentUpload, ServiceError>;
    async fn count(&self, application_id: Option<ObjectId>, status: Option<DocumentStatus>) -> Result<u64, ServiceError>;
}

pub struct DocumentServiceImpl {
    pub document_repo: SharedRepository<DocumentUpload>,
    pub application_service: Arc<dyn ApplicationService>,
    pub notification_service: Arc<dyn NotificationService>,
}

impl DocumentServiceImpl {
    pub fn new(
        document_repo: SharedRepository<DocumentUpload>,
        application_service: Arc<dyn ApplicationService>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self { document_repo, application_service, notification_service }
    }
}

fn check_file(request: &RegisterDocumentRequest) -> Result<(), ServiceError> {
    let content_type = request.content_type.to_ascii_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ServiceError::InvalidInput(format!(
            "Unsupported content type {}; expected one of {}",
            request.content_type,
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    if request.size == 0 || request.size > MAX_DOCUMENT_SIZE {
        return Err(ServiceError::InvalidInput(format!(
            "File size must be between 1 byte and {} bytes",
            MAX_DOCUMENT_SIZE
        )));
    }
    Ok(())
}

#[async_trait]
impl DocumentService for DocumentServiceImpl {
    #[instrument(skip(self, principal, request), fields(application_id = %application_id, document_type = ?request.document_type))]
    async fn register(&self, principal: &Principal, application_id: ObjectId, request: RegisterDocumentRequest) -> Result<DocumentUpload, ServiceError> {
        let application = self.application_service.get(principal, application_id).await?;
        if application.applicant_id != principal.user_id {
            return Err(ServiceError::Forbidden("Only the applicant can upload documents".to_string()));
        }
        check_file(&request)?;

        let existing = self
            .document_repo
            .find_one(doc! {
                "application_id": application_id,
                "document_type": filter_value(&request.document_type)?,
            })
            .await?;

        let res = match existing {
            Some(mut document) => {
                document.file_name = request.file_name;
                document.file_path = request.file_path;
                document.content_type = request.content_type.to_ascii_lowercase();
                document.size = request.size;
                document.status = DocumentStatus::Pending;
                document.remarks = None;
                document.reviewed_by = None;
                document.reviewed_at = None;
                self.document_repo.replace(document).await
            }
            None => {
                let document = DocumentUpload {
                    id: None,
                    application_id,
                    applicant_id: application.applicant_id,
                    document_type: request.document_type,
                    file_name: request.file_name,
                    file_path: request.file_path,
                    content_type: request.content_type.to_ascii_lowercase(),
                    size: request.size,
                    status: DocumentStatus::Pending,
                    remarks: None,
                    reviewed_by: None,
                    reviewed_at: None,
                    created_at: None,
                    updated_at: None,
                };
                self.document_repo.insert(document).await
            }
        };
        match &res {
            Ok(_) => info!("Document metadata stored"),
            Err(e) => error!("Failed to store document metadata: {e}"),
        }
        let stored = res?;

        self.application_service
            .record_activity(principal, application_id, ActivityAction::DocumentUploaded, None, Some(stored.file_name.clone()))
            .await?;
        Ok(stored)
    }

    async fn list_for_application(&self, principal: &Principal, application_id: ObjectId) -> Result<Vec<DocumentUpload>, ServiceError> {
        self.application_service.get(principal, application_id).await?;
        Ok(self
            .document_repo
            .find_many(doc! { "application_id": application_id }, SortOrder::OldestFirst, None)
            .await?)
    }

    #[instrument(skip(self, principal, remarks), fields(document_id = %document_id, status = ?status))]
    async fn review(&self, principal: &Principal, document_id: ObjectId, status: DocumentStatus, remarks: Option<String>) -> Result<DocumentUpload, ServiceError> {
        principal.require(Permission::VerifyDocuments)?;
        if status == DocumentStatus::Pending {
            return Err(ServiceError::InvalidInput("A review must verify or reject the document".to_string()));
        }

        let mut document = self.document_repo.get_by_id(&document_id).await?;
        document.status = status;
        document.remarks = remarks.clone();
        document.reviewed_by = Some(principal.user_id);
        document.reviewed_at = Some(now_rfc3339());
        let reviewed = self.document_repo.replace(document).await?;
        info!("Document reviewed");

        self.application_service
            .record_activity(principal, reviewed.application_id, ActivityAction::DocumentReviewed, None, remarks)
            .await?;

        let verdict = match status {
            DocumentStatus::Verified => "verified",
            _ => "rejected",
        };
        let mut message = format!("Your document {} was {}.", reviewed.file_name, verdict);
        if let Some(remarks) = reviewed.remarks.as_deref() {
            message.push_str(&format!(" Remarks: {}", remarks));
        }
        if let Err(e) = self
            .notification_service
            .notify(reviewed.applicant_id, NotificationKind::DocumentReview, "Document reviewed", &message)
            .await
        {
            error!("Failed to notify applicant of document review: {e}");
        }
        Ok(reviewed)
    }

    async fn count(&self, application_id: Option<ObjectId>, status: Option<DocumentStatus>) -> Result<u64, ServiceError> {
        let mut filter = doc! {};
        if let Some(application_id) = application_id {
            filter.insert("application_id", application_id);
        }
        if let Some(status) = status {
            filter.insert("status", filter_value(&status)?);
        }
        Ok(self.document_repo.count(filter).await?)
    }
}
