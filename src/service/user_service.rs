use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::BootstrapStaffConfig;
use crate::dto::user_dto::{CreateUserRequest, RegisterRequest, UserAuthResponse};
use crate::model::principal::Principal;
use crate::model::role::Permission;
use crate::model::user::{User, UserRole, UserWithoutPassword};
use crate::repository::{Page, SharedRepository, SortOrder};
use crate::service::{filter_value, now_rfc3339};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<UserAuthResponse, ServiceError>;
    /// Staff, panelist and supervisor accounts. Applicants self-register.
    async fn create_user(&self, principal: &Principal, request: CreateUserRequest) -> Result<UserWithoutPassword, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<UserAuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
    async fn get_profile(&self, user_id: ObjectId) -> Result<UserWithoutPassword, ServiceError>;
    async fn find_active(&self, user_id: ObjectId) -> Result<User, ServiceError>;
    async fn list_users(&self, principal: &Principal, role: Option<UserRole>, page: Page) -> Result<Vec<UserWithoutPassword>, ServiceError>;
    /// Returns the new token and its expiry. Delivery is left to the caller.
    async fn request_email_verification(&self, user_id: ObjectId) -> Result<(String, String), ServiceError>;
    async fn verify_email(&self, token: String) -> Result<UserWithoutPassword, ServiceError>;
    /// Creates the first OAS staff account unless that email is taken.
    async fn ensure_bootstrap_staff(&self, config: &BootstrapStaffConfig) -> Result<bool, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: SharedRepository<User>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl UserServiceImpl {
    pub fn new(user_repo: SharedRepository<User>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { user_repo, jwt_utils }
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair, ServiceError> {
        let id = user.id.map(|id| id.to_hex()).unwrap_or_default();
        self.jwt_utils
            .generate_token_pair(&id, &user.email, user.role)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    /// Hash, check uniqueness and insert.
    async fn insert_user(&self, mut user: User, password: &str) -> Result<User, ServiceError> {
        if let Err(errors) = PasswordUtilsImpl::validate_password_strength(password) {
            return Err(ServiceError::InvalidInput(errors.join("; ")));
        }
        if self.user_repo.find_one(doc! { "email": user.email.as_str() }).await?.is_some() {
            warn!("Email already registered");
            return Err(ServiceError::Conflict(format!("Email already registered: {}", user.email)));
        }
        user.password_hash = PasswordUtilsImpl::hash_password(password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;

        let inserted = self.user_repo.insert(user).await;
        match &inserted {
            Ok(_) => info!("User inserted successfully"),
            Err(e) => error!("Failed to insert user: {e}"),
        }
        Ok(inserted?)
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    async fn register(&self, request: RegisterRequest) -> Result<UserAuthResponse, ServiceError> {
        info!("Registering new applicant");
        let user = User::new(request.username, request.first_name, request.last_name, request.email, UserRole::Applicant);
        let inserted = self.insert_user(user, &request.password).await?;
        let tokens = self.issue_tokens(&inserted)?;
        Ok(UserAuthResponse { user: inserted.into(), tokens })
    }

    #[instrument(skip(self, principal, request), fields(email = %request.email, role = %request.role))]
    async fn create_user(&self, principal: &Principal, request: CreateUserRequest) -> Result<UserWithoutPassword, ServiceError> {
        principal.require(Permission::ManageUsers)?;
        if request.role == UserRole::Applicant {
            warn!("Rejected staff-created applicant account");
            return Err(ServiceError::InvalidInput("Applicants must register themselves".to_string()));
        }
        info!("Creating user account");
        let user = User::new(request.username, request.first_name, request.last_name, request.email, request.role);
        Ok(self.insert_user(user, &request.password).await?.into())
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String) -> Result<UserAuthResponse, ServiceError> {
        info!("User login attempt");
        let invalid = || ServiceError::Unauthorized("Invalid credentials".to_string());

        let user = match self.user_repo.find_one(doc! { "email": email.to_lowercase() }).await? {
            Some(user) => user,
            None => {
                warn!("User not found for login");
                return Err(invalid());
            }
        };
        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            warn!("Invalid credentials");
            return Err(invalid());
        }
        if !user.active {
            return Err(ServiceError::Forbidden("Account is deactivated".to_string()));
        }

        let tokens = self.issue_tokens(&user)?;
        info!("User logged in successfully");
        Ok(UserAuthResponse { user: user.into(), tokens })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        let claims = self.jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid token subject".to_string()))?;
        let user = self.find_active(user_id).await?;
        self.issue_tokens(&user)
    }

    async fn get_profile(&self, user_id: ObjectId) -> Result<UserWithoutPassword, ServiceError> {
        Ok(self.user_repo.get_by_id(&user_id).await?.into())
    }

    async fn find_active(&self, user_id: ObjectId) -> Result<User, ServiceError> {
        match self.user_repo.find_by_id(&user_id).await? {
            Some(user) if user.active => Ok(user),
            Some(_) => Err(ServiceError::Forbidden("Account is deactivated".to_string())),
            None => Err(ServiceError::Unauthorized("Unknown user".to_string())),
        }
    }

    #[instrument(skip(self, principal))]
    async fn list_users(&self, principal: &Principal, role: Option<UserRole>, page: Page) -> Result<Vec<UserWithoutPassword>, ServiceError> {
        principal.require(Permission::ManageUsers)?;
        let mut filter = doc! {};
        if let Some(role) = role {
            filter.insert("role", filter_value(&role)?);
        }
        let users = self.user_repo.find_many(filter, SortOrder::OldestFirst, Some(page)).await?;
        Ok(users.into_iter().map(UserWithoutPassword::from).collect())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn request_email_verification(&self, user_id: ObjectId) -> Result<(String, String), ServiceError> {
        let mut user = self.user_repo.get_by_id(&user_id).await?;
        if user.email_verification.verified {
            return Err(ServiceError::Conflict("Email is already verified".to_string()));
        }
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = (Utc::now() + Duration::hours(EMAIL_VERIFICATION_TTL_HOURS)).to_rfc3339();
        user.email_verification.token = Some(token.clone());
        user.email_verification.expires_at = Some(expires_at.clone());
        self.user_repo.replace(user).await?;
        debug!(token = %token, "Email verification token issued");
        Ok((token, expires_at))
    }

    #[instrument(skip(self, token))]
    async fn verify_email(&self, token: String) -> Result<UserWithoutPassword, ServiceError> {
        let mut user = self
            .user_repo
            .find_one(doc! { "email_verification.token": token.as_str() })
            .await?
            .ok_or_else(|| ServiceError::InvalidInput("Invalid verification token".to_string()))?;

        let expired = user
            .email_verification
            .expires_at
            .as_deref()
            .and_then(|at| chrono::DateTime::parse_from_rfc3339(at).ok())
            .map_or(true, |at| at < Utc::now());
        if expired {
            return Err(ServiceError::InvalidInput("Verification token has expired".to_string()));
        }

        user.email_verification.verified = true;
        user.email_verification.verified_at = Some(now_rfc3339());
        user.email_verification.token = None;
        user.email_verification.expires_at = None;
        let user = self.user_repo.replace(user).await?;
        info!("Email verified");
        Ok(user.into())
    }

    #[instrument(skip(self, config), fields(email = %config.email))]
    async fn ensure_bootstrap_staff(&self, config: &BootstrapStaffConfig) -> Result<bool, ServiceError> {
        let email = config.email.to_lowercase();
        if self.user_repo.find_one(doc! { "email": email.as_str() }).await?.is_some() {
            info!("Bootstrap staff account already exists, skipping creation.");
            return Ok(false);
        }
        let mut user = User::new(
            config.username.clone(),
            config.first_name.clone(),
            config.last_name.clone(),
            email,
            UserRole::OasStaff,
        );
        user.email_verification.verified = true;
        self.insert_user(user, &config.password).await?;
        info!("Bootstrap staff account created.");
        Ok(true)
    }
}
