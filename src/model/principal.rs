use bson::oid::ObjectId;
use std::collections::HashSet;

use crate::model::role::Permission;
use crate::model::user::UserRole;
use crate::util::error::ServiceError;

/// The authenticated caller of a request, with permissions resolved from its role.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: ObjectId,
    pub email: String,
    pub role: UserRole,
    pub permissions: HashSet<Permission>,
}

impl Principal {
    pub fn new(user_id: ObjectId, email: impl Into<String>, role: UserRole, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Principal {
            user_id,
            email: email.into(),
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), ServiceError> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!("Missing permission {}", permission)))
        }
    }

    /// Passes when the caller owns the record or holds `permission`.
    pub fn require_owner_or(&self, owner_id: &ObjectId, permission: Permission) -> Result<(), ServiceError> {
        if &self.user_id == owner_id || self.has(permission) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Not allowed to access this record".to_string()))
        }
    }
}
