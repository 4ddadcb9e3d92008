use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::impl_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StatusChange,
    DocumentReview,
    Interview,
    Account,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub read_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(Notification, "notifications");

impl Notification {
    pub fn new(user_id: ObjectId, kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Notification {
            id: None,
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            read: false,
            read_at: None,
            created_at: None,
            updated_at: None,
        }
    }
}
