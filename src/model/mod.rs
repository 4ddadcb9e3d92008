pub mod user;
pub mod role;
pub mod application_form;
pub mod document_upload;
pub mod evaluation;
pub mod interview;
pub mod notification;
pub mod activity_log;
pub mod principal;

use bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Serialize};

/// A record stored in its own MongoDB collection.
///
/// Every record carries an optional `_id` plus RFC 3339 `created_at` /
/// `updated_at` stamps that the repository layer maintains.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);
    fn created_at(&self) -> Option<&str>;
    fn set_timestamps(&mut self, created_at: Option<String>, updated_at: String);
}

macro_rules! impl_entity {
    ($ty:ty, $collection:literal) => {
        impl $crate::model::Entity for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> Option<bson::oid::ObjectId> {
                self.id
            }

            fn set_id(&mut self, id: bson::oid::ObjectId) {
                self.id = Some(id);
            }

            fn created_at(&self) -> Option<&str> {
                self.created_at.as_deref()
            }

            fn set_timestamps(&mut self, created_at: Option<String>, updated_at: String) {
                if created_at.is_some() {
                    self.created_at = created_at;
                }
                self.updated_at = Some(updated_at);
            }
        }
    };
}

pub(crate) use impl_entity;
