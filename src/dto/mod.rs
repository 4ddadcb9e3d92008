pub mod user_dto;
pub mod role_dto;
pub mod application_dto;
pub mod document_dto;
pub mod personality_test_dto;
pub mod interview_dto;
pub mod evaluation_dto;
pub mod dashboard_dto;
