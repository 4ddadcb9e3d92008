use serde::Deserialize;
use validator::Validate;

use crate::model::document_upload::{DocumentStatus, DocumentType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDocumentRequest {
    pub document_type: DocumentType,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 1024))]
    pub file_path: String,
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewDocumentRequest {
    pub status: DocumentStatus,
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}
