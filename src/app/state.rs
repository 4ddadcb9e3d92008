use axum::{routing::get, Router};
use mongodb::Database;
use std::sync::Arc;

use crate::middlewares::auth_middleware::AuthState;
use crate::model::activity_log::ApplicationActivityLog;
use crate::model::application_form::ApplicationForm;
use crate::model::document_upload::DocumentUpload;
use crate::model::evaluation::Evaluation;
use crate::model::interview::Interview;
use crate::model::notification::Notification;
use crate::model::personality_test::{PersonalityTest, PersonalityTestAnswer, PersonalityTestTemplate};
use crate::model::role::{PermissionRecord, Role};
use crate::model::user::User;
use crate::repository::repository_error::RepositoryResult;
use crate::repository::{MongoRepository, SharedRepository};
use crate::router::{
    application_router::application_router, dashboard_router::dashboard_router, document_router::document_router,
    evaluation_router::evaluation_router, interview_router::interview_router,
    notification_router::notification_router, personality_test_router::personality_test_router,
    role_router::role_router, user_router::user_router,
};
use crate::service::application_service::{ApplicationService, ApplicationServiceImpl};
use crate::service::dashboard_service::{DashboardService, DashboardServiceImpl};
use crate::service::document_service::{DocumentService, DocumentServiceImpl};
use crate::service::evaluation_service::{EvaluationService, EvaluationServiceImpl};
use crate::service::interview_service::{InterviewService, InterviewServiceImpl};
use crate::service::notification_service::{NotificationService, NotificationServiceImpl};
use crate::service::personality_test_service::{PersonalityTestService, PersonalityTestServiceImpl};
use crate::service::role_service::{RoleService, RoleServiceImpl};
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;

/// One repository per collection.
#[derive(Clone)]
pub struct Repositories {
    pub users: SharedRepository<User>,
    pub roles: SharedRepository<Role>,
    pub permissions: SharedRepository<PermissionRecord>,
    pub applications: SharedRepository<ApplicationForm>,
    pub activity_logs: SharedRepository<ApplicationActivityLog>,
    pub documents: SharedRepository<DocumentUpload>,
    pub test_templates: SharedRepository<PersonalityTestTemplate>,
    pub tests: SharedRepository<PersonalityTest>,
    pub test_answers: SharedRepository<PersonalityTestAnswer>,
    pub interviews: SharedRepository<Interview>,
    pub evaluations: SharedRepository<Evaluation>,
    pub notifications: SharedRepository<Notification>,
}

impl Repositories {
    /// MongoDB-backed repositories with their unique indexes in place.
    pub async fn mongo(db: &Database) -> RepositoryResult<Self> {
        let users = MongoRepository::<User>::new(db);
        users.ensure_unique_index("email").await?;
        let roles = MongoRepository::<Role>::new(db);
        roles.ensure_unique_index("name").await?;
        let permissions = MongoRepository::<PermissionRecord>::new(db);
        permissions.ensure_unique_index("code").await?;
        let applications = MongoRepository::<ApplicationForm>::new(db);
        applications.ensure_unique_index("applicant_id").await?;

        Ok(Repositories {
            users: Arc::new(users),
            roles: Arc::new(roles),
            permissions: Arc::new(permissions),
            applications: Arc::new(applications),
            activity_logs: Arc::new(MongoRepository::new(db)),
            documents: Arc::new(MongoRepository::new(db)),
            test_templates: Arc::new(MongoRepository::new(db)),
            tests: Arc::new(MongoRepository::new(db)),
            test_answers: Arc::new(MongoRepository::new(db)),
            interviews: Arc::new(MongoRepository::new(db)),
            evaluations: Arc::new(MongoRepository::new(db)),
            notifications: Arc::new(MongoRepository::new(db)),
        })
    }
}

/// Every service, wired over a set of repositories.
#[derive(Clone)]
pub struct Services {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user: Arc<dyn UserService>,
    pub role: Arc<dyn RoleService>,
    pub notification: Arc<dyn NotificationService>,
    pub application: Arc<dyn ApplicationService>,
    pub document: Arc<dyn DocumentService>,
    pub personality_test: Arc<dyn PersonalityTestService>,
    pub interview: Arc<dyn InterviewService>,
    pub evaluation: Arc<dyn EvaluationService>,
    pub dashboard: Arc<dyn DashboardService>,
}

impl Services {
    pub fn new(repos: Repositories, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        let user: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(repos.users.clone(), jwt_utils.clone()));
        let role: Arc<dyn RoleService> = Arc::new(RoleServiceImpl::new(repos.roles, repos.permissions));
        let notification: Arc<dyn NotificationService> = Arc::new(NotificationServiceImpl::new(repos.notifications));
        let application: Arc<dyn ApplicationService> = Arc::new(ApplicationServiceImpl::new(
            repos.applications,
            repos.activity_logs,
            notification.clone(),
        ));
        let document: Arc<dyn DocumentService> = Arc::new(DocumentServiceImpl::new(
            repos.documents,
            application.clone(),
            notification.clone(),
        ));
        let personality_test: Arc<dyn PersonalityTestService> = Arc::new(PersonalityTestServiceImpl::new(
            repos.test_templates,
            repos.tests,
            repos.test_answers,
        ));
        let interview: Arc<dyn InterviewService> = Arc::new(InterviewServiceImpl::new(
            repos.interviews,
            repos.users.clone(),
            application.clone(),
            notification.clone(),
        ));
        let evaluation: Arc<dyn EvaluationService> = Arc::new(EvaluationServiceImpl::new(
            repos.evaluations,
            repos.users,
            application.clone(),
        ));
        let dashboard: Arc<dyn DashboardService> = Arc::new(DashboardServiceImpl {
            application_service: application.clone(),
            document_service: document.clone(),
            personality_test_service: personality_test.clone(),
            interview_service: interview.clone(),
            evaluation_service: evaluation.clone(),
            notification_service: notification.clone(),
        });

        Services {
            jwt_utils,
            user,
            role,
            notification,
            application,
            document,
            personality_test,
            interview,
            evaluation,
            dashboard,
        }
    }

    /// All resource routers merged, plus `/health`.
    pub fn router(&self) -> Router {
        let auth_state = Arc::new(AuthState {
            jwt_utils: self.jwt_utils.clone(),
            user_service: self.user.clone(),
            role_service: self.role.clone(),
        });

        Router::new()
            .merge(user_router(self.user.clone(), auth_state.clone()))
            .merge(role_router(self.role.clone(), auth_state.clone()))
            .merge(application_router(self.application.clone(), auth_state.clone()))
            .merge(document_router(self.document.clone(), auth_state.clone()))
            .merge(personality_test_router(self.personality_test.clone(), auth_state.clone()))
            .merge(interview_router(self.interview.clone(), auth_state.clone()))
            .merge(evaluation_router(self.evaluation.clone(), auth_state.clone()))
            .merge(notification_router(self.notification.clone(), auth_state.clone()))
            .merge(dashboard_router(self.dashboard.clone(), auth_state))
            .route("/health", get(|| async { "OK" }))
    }
}
