use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::model::impl_entity;

/// Where an application currently sits in the review pipeline.
///
/// Staff move applications between any two statuses; the only rule attached
/// to a status is that applicants may edit their own form while `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    DocumentVerification,
    InterviewScheduled,
    InterviewCompleted,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::DocumentVerification,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::InterviewCompleted,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::DocumentVerification => "document_verification",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::InterviewCompleted => "interview_completed",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::DocumentVerification => "Document Verification",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::InterviewCompleted => "Interview Completed",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Step of the applicant's progress tracker, 1 through 5.
    pub fn dashboard_step(&self) -> u8 {
        match self {
            ApplicationStatus::Pending => 1,
            ApplicationStatus::DocumentVerification => 2,
            ApplicationStatus::InterviewScheduled => 3,
            ApplicationStatus::InterviewCompleted => 4,
            ApplicationStatus::Approved | ApplicationStatus::Rejected => 5,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    pub fn is_editable_by_applicant(&self) -> bool {
        matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown application status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersonalInformation {
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[validate(length(max = 64))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[validate(length(min = 1, max = 128))]
    pub birth_place: String,
    #[validate(length(min = 1, max = 32))]
    pub gender: String,
    #[validate(length(min = 1, max = 32))]
    pub civil_status: String,
    #[validate(length(min = 1, max = 64))]
    pub nationality: String,
    pub religion: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub contact_number: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub permanent_address: String,
    #[validate(length(max = 256))]
    pub present_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ParentInformation {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub occupation: Option<String>,
    pub contact_number: Option<String>,
    #[serde(default)]
    pub deceased: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Sibling {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(range(max = 120))]
    pub age: u8,
    pub educational_attainment: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FamilyBackground {
    #[validate(nested)]
    pub father: Option<ParentInformation>,
    #[validate(nested)]
    pub mother: Option<ParentInformation>,
    #[validate(nested)]
    pub guardian: Option<ParentInformation>,
    #[validate(range(min = 0.0))]
    pub monthly_family_income: f64,
    #[serde(default)]
    #[validate(length(max = 10), nested)]
    pub siblings: Vec<Sibling>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SecondaryEducation {
    #[validate(length(min = 1, max = 128))]
    pub school_name: String,
    pub school_address: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub year_graduated: u16,
    #[validate(range(min = 0.0, max = 100.0))]
    pub general_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CollegeRecord {
    #[validate(length(min = 1, max = 128))]
    pub school_name: String,
    #[validate(length(min = 1, max = 128))]
    pub course: String,
    #[validate(range(min = 1, max = 6))]
    pub year_level: u8,
    #[validate(length(min = 4, max = 16))]
    pub school_year: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub general_weighted_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EducationalBackground {
    #[validate(nested)]
    pub senior_high_school: SecondaryEducation,
    #[validate(length(min = 1, max = 128))]
    pub intended_course: String,
    #[validate(range(min = 1, max = 6))]
    pub year_level: u8,
    #[serde(default)]
    #[validate(length(max = 10), nested)]
    pub college_records: Vec<CollegeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Organization {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub position: Option<String>,
    #[validate(length(max = 32))]
    pub inclusive_years: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CharacterReference {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub relationship: String,
    #[validate(length(min = 7, max = 20))]
    pub contact_number: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationForm {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub applicant_id: ObjectId,
    pub personal: PersonalInformation,
    pub family: FamilyBackground,
    pub education: EducationalBackground,
    pub organizations: Vec<Organization>,
    pub references: Vec<CharacterReference>,
    pub status: ApplicationStatus,
    pub status_remarks: Option<String>,
    pub submitted_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(ApplicationForm, "application_forms");
