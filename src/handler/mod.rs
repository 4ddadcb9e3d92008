pub mod user_handler;
pub mod role_handler;
pub mod application_handler;
pub mod document_handler;
pub mod personality_test_handler;
pub mod interview_handler;
pub mod evaluation_handler;
pub mod notification_handler;
pub mod dashboard_handler;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

/// Parse a `{id}` path segment.
pub(crate) fn parse_id(value: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(value).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", what)))
}
