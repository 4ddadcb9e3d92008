use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::impl_entity;

pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BirthCertificate,
    ReportCard,
    CertificateOfEnrollment,
    IncomeCertificate,
    GoodMoral,
    IdPhoto,
    BarangayClearance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

/// Metadata of one uploaded file. The bytes live wherever `file_path` points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub application_id: ObjectId,
    pub applicant_id: ObjectId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_path: String,
    pub content_type: String,
    pub size: u64,
    pub status: DocumentStatus,
    pub remarks: Option<String>,
    pub reviewed_by: Option<ObjectId>,
    pub reviewed_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(DocumentUpload, "document_uploads");
