use bson::oid::ObjectId;
use serde::Serialize;

use crate::model::application_form::ApplicationStatus;
use crate::model::interview::Interview;

/// What `/dashboard` returns, shaped by the caller's role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardSummary {
    Applicant(ApplicantDashboard),
    OasStaff(StaffDashboard),
    Panelist(PanelistDashboard),
    NasSupervisor(SupervisorDashboard),
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantDashboard {
    pub application_id: Option<ObjectId>,
    pub status: Option<ApplicationStatus>,
    pub status_label: Option<String>,
    /// 0 until an application is submitted
    pub step: u8,
    pub total_steps: u8,
    pub documents_uploaded: u64,
    pub documents_verified: u64,
    pub personality_test_completed: bool,
    pub upcoming_interview: Option<Interview>,
    pub unread_notifications: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffDashboard {
    pub total_applications: u64,
    pub by_status: Vec<StatusCount>,
    pub pending_document_reviews: u64,
    pub scheduled_interviews: u64,
    pub unread_notifications: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelistDashboard {
    pub upcoming_interviews: Vec<Interview>,
    pub completed_interviews: u64,
    pub unread_notifications: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupervisorDashboard {
    pub evaluations_submitted: u64,
    pub approved_scholars: u64,
    pub unread_notifications: u64,
}
