use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::application_form::{
    ApplicationForm, ApplicationStatus, CharacterReference, EducationalBackground, FamilyBackground,
    Organization, PersonalInformation,
};

/// Body of both the initial submission and later edits.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicationFormRequest {
    #[validate(nested)]
    pub personal: PersonalInformation,
    #[validate(nested)]
    pub family: FamilyBackground,
    #[validate(nested)]
    pub education: EducationalBackground,
    #[serde(default)]
    #[validate(length(max = 10), nested)]
    pub organizations: Vec<Organization>,
    #[validate(length(min = 1, max = 10), nested)]
    pub references: Vec<CharacterReference>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<ApplicationStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPage {
    pub items: Vec<ApplicationForm>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
