use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{error, info, instrument};

use crate::model::notification::{Notification, NotificationKind};
use crate::repository::{SharedRepository, SortOrder};
use crate::service::now_rfc3339;
use crate::util::error::ServiceError;

/// Stored in-app notifications. Nothing is pushed or emailed.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn notify(&self, user_id: ObjectId, kind: NotificationKind, title: &str, message: &str) -> Result<Notification, ServiceError>;
    async fn list_for_user(&self, user_id: ObjectId, unread_only: bool) -> Result<Vec<Notification>, ServiceError>;
    async fn mark_read(&self, user_id: ObjectId, notification_id: ObjectId) -> Result<Notification, ServiceError>;
    async fn unread_count(&self, user_id: ObjectId) -> Result<u64, ServiceError>;
}

pub struct NotificationServiceImpl {
    pub notification_repo: SharedRepository<Notification>,
}

impl NotificationServiceImpl {
    pub fn new(notification_repo: SharedRepository<Notification>) -> Self {
        Self { notification_repo }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    #[instrument(skip(self, message), fields(user_id = %user_id, kind = ?kind))]
    async fn notify(&self, user_id: ObjectId, kind: NotificationKind, title: &str, message: &str) -> Result<Notification, ServiceError> {
        let res = self.notification_repo.insert(Notification::new(user_id, kind, title, message)).await;
        match &res {
            Ok(_) => info!("Notification stored"),
            Err(e) => error!("Failed to store notification: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_for_user(&self, user_id: ObjectId, unread_only: bool) -> Result<Vec<Notification>, ServiceError> {
        let mut filter = doc! { "user_id": user_id };
        if unread_only {
            filter.insert("read", false);
        }
        Ok(self.notification_repo.find_many(filter, SortOrder::NewestFirst, None).await?)
    }

    #[instrument(skip(self), fields(user_id = %user_id, notification_id = %notification_id))]
    async fn mark_read(&self, user_id: ObjectId, notification_id: ObjectId) -> Result<Notification, ServiceError> {
        let mut notification = self.notification_repo.get_by_id(&notification_id).await?;
        if notification.user_id != user_id {
            return Err(ServiceError::Forbidden("Notification belongs to another user".to_string()));
        }
        if notification.read {
            return Ok(notification);
        }
        notification.read = true;
        notification.read_at = Some(now_rfc3339());
        Ok(self.notification_repo.replace(notification).await?)
    }

    async fn unread_count(&self, user_id: ObjectId) -> Result<u64, ServiceError> {
        Ok(self.notification_repo.count(doc! { "user_id": user_id, "read": false }).await?)
    }
}
