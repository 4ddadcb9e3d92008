use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::impl_entity;
use crate::model::user::UserRole;

/// Action codes checked by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "application:submit")]
    SubmitApplication,
    #[serde(rename = "application:review")]
    ReviewApplications,
    #[serde(rename = "document:verify")]
    VerifyDocuments,
    #[serde(rename = "test:take")]
    TakePersonalityTest,
    #[serde(rename = "test:manage")]
    ManagePersonalityTests,
    #[serde(rename = "interview:schedule")]
    ScheduleInterviews,
    #[serde(rename = "interview:recommend")]
    RecommendApplicants,
    #[serde(rename = "evaluation:submit")]
    SubmitEvaluations,
    #[serde(rename = "evaluation:view")]
    ViewEvaluations,
    #[serde(rename = "user:manage")]
    ManageUsers,
    #[serde(rename = "role:manage")]
    ManageRoles,
}

impl Permission {
    pub const ALL: [Permission; 11] = [
        Permission::SubmitApplication,
        Permission::ReviewApplications,
        Permission::VerifyDocuments,
        Permission::TakePersonalityTest,
        Permission::ManagePersonalityTests,
        Permission::ScheduleInterviews,
        Permission::RecommendApplicants,
        Permission::SubmitEvaluations,
        Permission::ViewEvaluations,
        Permission::ManageUsers,
        Permission::ManageRoles,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Permission::SubmitApplication => "application:submit",
            Permission::ReviewApplications => "application:review",
            Permission::VerifyDocuments => "document:verify",
            Permission::TakePersonalityTest => "test:take",
            Permission::ManagePersonalityTests => "test:manage",
            Permission::ScheduleInterviews => "interview:schedule",
            Permission::RecommendApplicants => "interview:recommend",
            Permission::SubmitEvaluations => "evaluation:submit",
            Permission::ViewEvaluations => "evaluation:view",
            Permission::ManageUsers => "user:manage",
            Permission::ManageRoles => "role:manage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::SubmitApplication => "Submit and edit one's own scholarship application",
            Permission::ReviewApplications => "Review applications and change their status",
            Permission::VerifyDocuments => "Verify or reject uploaded documents",
            Permission::TakePersonalityTest => "Take a personality test",
            Permission::ManagePersonalityTests => "Create personality test templates and read results",
            Permission::ScheduleInterviews => "Schedule and cancel interviews",
            Permission::RecommendApplicants => "Submit interview recommendations",
            Permission::SubmitEvaluations => "Submit scholar performance evaluations",
            Permission::ViewEvaluations => "Read scholar performance evaluations",
            Permission::ManageUsers => "Create and list user accounts",
            Permission::ManageRoles => "Manage roles and their permissions",
        }
    }

    /// Grants a freshly seeded role receives.
    pub fn defaults_for(role: UserRole) -> Vec<Permission> {
        match role {
            UserRole::Applicant => vec![Permission::SubmitApplication, Permission::TakePersonalityTest],
            UserRole::OasStaff => vec![
                Permission::ReviewApplications,
                Permission::VerifyDocuments,
                Permission::ManagePersonalityTests,
                Permission::ScheduleInterviews,
                Permission::ViewEvaluations,
                Permission::ManageUsers,
                Permission::ManageRoles,
            ],
            UserRole::Panelist => vec![Permission::RecommendApplicants],
            UserRole::NasSupervisor => vec![Permission::SubmitEvaluations, Permission::ViewEvaluations],
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(Role, "roles");

impl Role {
    pub fn seeded(role: UserRole) -> Self {
        let description = match role {
            UserRole::Applicant => "Scholarship applicant",
            UserRole::OasStaff => "Office of Academic Scholarships staff",
            UserRole::Panelist => "Interview panelist",
            UserRole::NasSupervisor => "Non-Academic Scholars supervisor",
        };
        Role {
            id: None,
            name: role.as_str().to_string(),
            description: description.to_string(),
            permissions: Permission::defaults_for(role),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Catalogue entry mirroring [`Permission`] so the admin UI can list it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRecord {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub code: Permission,
    pub description: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl_entity!(PermissionRecord, "permissions");

impl From<Permission> for PermissionRecord {
    fn from(permission: Permission) -> Self {
        PermissionRecord {
            id: None,
            code: permission,
            description: permission.description().to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}
