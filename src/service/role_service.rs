use async_trait::async_trait;
use bson::doc;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

use crate::model::principal::Principal;
use crate::model::role::{Permission, PermissionRecord, Role};
use crate::model::user::UserRole;
use crate::repository::{SharedRepository, SortOrder};
use crate::util::error::ServiceError;

#[async_trait]
pub trait RoleService: Send + Sync {
    /// Insert the permission catalogue and default roles that are missing.
    async fn seed_defaults(&self) -> Result<(), ServiceError>;
    async fn permissions_for(&self, role: UserRole) -> Result<HashSet<Permission>, ServiceError>;
    async fn list_roles(&self, principal: &Principal) -> Result<Vec<Role>, ServiceError>;
    async fn list_permissions(&self, principal: &Principal) -> Result<Vec<PermissionRecord>, ServiceError>;
    async fn create_role(&self, principal: &Principal, name: &str, description: &str, permissions: &[String]) -> Result<Role, ServiceError>;
    async fn set_permissions(&self, principal: &Principal, name: &str, permissions: &[String]) -> Result<Role, ServiceError>;
}

pub struct RoleServiceImpl {
    pub role_repo: SharedRepository<Role>,
    pub permission_repo: SharedRepository<PermissionRecord>,
}

fn parse_permissions(codes: &[String]) -> Result<Vec<Permission>, ServiceError> {
    let mut parsed: Vec<Permission> = Vec::with_capacity(codes.len());
    for code in codes {
        let permission = code.parse::<Permission>().map_err(ServiceError::InvalidInput)?;
        if !parsed.contains(&permission) {
            parsed.push(permission);
        }
    }
    Ok(parsed)
}

fn parse_role_name(name: &str) -> Result<UserRole, ServiceError> {
    name.parse::<UserRole>().map_err(ServiceError::InvalidInput)
}

impl RoleServiceImpl {
    pub fn new(role_repo: SharedRepository<Role>, permission_repo: SharedRepository<PermissionRecord>) -> Self {
        Self { role_repo, permission_repo }
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>, ServiceError> {
        Ok(self.role_repo.find_one(doc! { "name": name }).await?)
    }
}

#[async_trait]
impl RoleService for RoleServiceImpl {
    #[instrument(skip(self))]
    async fn seed_defaults(&self) -> Result<(), ServiceError> {
        for permission in Permission::ALL {
            let existing = self.permission_repo.find_one(doc! { "code": permission.code() }).await?;
            if existing.is_none() {
                self.permission_repo.insert(PermissionRecord::from(permission)).await?;
                info!(permission = %permission, "Seeded permission");
            }
        }
        for role in UserRole::ALL {
            if self.find_role(role.as_str()).await?.is_none() {
                self.role_repo.insert(Role::seeded(role)).await?;
                info!(role = %role, "Seeded role");
            }
        }
        Ok(())
    }

    async fn permissions_for(&self, role: UserRole) -> Result<HashSet<Permission>, ServiceError> {
        match self.find_role(role.as_str()).await? {
            Some(stored) => Ok(stored.permissions.into_iter().collect()),
            None => {
                warn!(role = %role, "Role document missing, using default permissions");
                Ok(Permission::defaults_for(role).into_iter().collect())
            }
        }
    }

    async fn list_roles(&self, principal: &Principal) -> Result<Vec<Role>, ServiceError> {
        principal.require(Permission::ManageRoles)?;
        Ok(self.role_repo.find_many(doc! {}, SortOrder::OldestFirst, None).await?)
    }

    async fn list_permissions(&self, principal: &Principal) -> Result<Vec<PermissionRecord>, ServiceError> {
        principal.require(Permission::ManageRoles)?;
        Ok(self.permission_repo.find_many(doc! {}, SortOrder::OldestFirst, None).await?)
    }

    /// Roles map one-to-one onto account kinds, so only a kind whose
    /// document was removed can be created again.
    #[instrument(skip(self, principal, description, permissions))]
    async fn create_role(&self, principal: &Principal, name: &str, description: &str, permissions: &[String]) -> Result<Role, ServiceError> {
        principal.require(Permission::ManageRoles)?;
        let role = parse_role_name(name)?;
        if self.find_role(role.as_str()).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Role {} already exists", name)));
        }
        let stored = Role {
            id: None,
            name: role.as_str().to_string(),
            description: description.to_string(),
            permissions: parse_permissions(permissions)?,
            created_at: None,
            updated_at: None,
        };
        let created = self.role_repo.insert(stored).await?;
        info!("Role created");
        Ok(created)
    }

    #[instrument(skip(self, principal, permissions))]
    async fn set_permissions(&self, principal: &Principal, name: &str, permissions: &[String]) -> Result<Role, ServiceError> {
        principal.require(Permission::ManageRoles)?;
        let mut role = self
            .find_role(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Role not found: {}", name)))?;
        role.permissions = parse_permissions(permissions)?;
        let updated = self.role_repo.replace(role).await?;
        info!(count = updated.permissions.len(), "Role permissions replaced");
        Ok(updated)
    }
}
