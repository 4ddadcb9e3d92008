pub mod user_service;
pub mod role_service;
pub mod notification_service;
pub mod application_service;
pub mod document_service;
pub mod personality_test_service;
pub mod interview_service;
pub mod evaluation_service;
pub mod dashboard_service;

use bson::{oid::ObjectId, Bson};
use serde::Serialize;

use crate::util::error::ServiceError;

/// Parse a 24-hex id taken from a path or request body.
pub fn parse_object_id(value: &str, what: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(value).map_err(|_| ServiceError::InvalidInput(format!("Invalid {} id: {}", what, value)))
}

/// BSON form of an enum value for use in equality filters.
pub(crate) fn filter_value<T: Serialize>(value: &T) -> Result<Bson, ServiceError> {
    Ok(bson::to_bson(value)?)
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
