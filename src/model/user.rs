use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::impl_entity;

/// The four account kinds the dashboards are built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Applicant,
    OasStaff,
    Panelist,
    NasSupervisor,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Applicant,
        UserRole::OasStaff,
        UserRole::Panelist,
        UserRole::NasSupervisor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Applicant => "applicant",
            UserRole::OasStaff => "oas_staff",
            UserRole::Panelist => "panelist",
            UserRole::NasSupervisor => "nas_supervisor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailVerification {
    pub verified: bool,
    pub token: Option<String>,
    pub expires_at: Option<String>,
    pub verified_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    #[serde(default)]
    pub email_verification: EmailVerification,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl_entity!(User, "users");

impl User {
    pub fn new(username: String, first_name: String, last_name: String, email: String, role: UserRole) -> Self {
        User {
            id: None,
            username,
            first_name,
            last_name,
            email: email.to_lowercase(),
            password_hash: String::new(),
            role,
            email_verification: EmailVerification::default(),
            active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

/// User as returned over the API, without credentials or verification token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithoutPassword {
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserWithoutPassword {
    fn from(user: User) -> Self {
        UserWithoutPassword {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            email_verified: user.email_verification.verified,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
