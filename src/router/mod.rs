pub mod user_router;
pub mod role_router;
pub mod application_router;
pub mod document_router;
pub mod personality_test_router;
pub mod interview_router;
pub mod evaluation_router;
pub mod notification_router;
pub mod dashboard_router;
