#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bson::{oid::ObjectId, Bson, Document};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use nas_backend::app::{Repositories, Services};
use nas_backend::config::JwtConfig;
use nas_backend::dto::application_dto::ApplicationFormRequest;
use nas_backend::dto::user_dto::{CreateUserRequest, RegisterRequest};
use nas_backend::model::application_form::{
    CharacterReference, EducationalBackground, FamilyBackground, ParentInformation, PersonalInformation,
    SecondaryEducation,
};
use nas_backend::model::principal::Principal;
use nas_backend::model::role::Permission;
use nas_backend::model::user::{User, UserRole, UserWithoutPassword};
use nas_backend::model::Entity;
use nas_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use nas_backend::repository::{Page, Repository, SortOrder};
use nas_backend::util::jwt::JwtTokenUtilsImpl;
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()

pub const TEST_PASSWORD: &str = "Scholar2025@";

/// Vec-backed repository with equality filters and optional unique fields.
pub struct InMemoryRepository<T: Entity> {
    items: Mutex<Vec<T>>,
    unique_fields: Vec<&'static str>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self { items: Mutex::new(Vec::new()), unique_fields: Vec::new() }
    }

    pub fn with_unique(field: &'static str) -> Self {
        Self { items: Mutex::new(Vec::new()), unique_fields: vec![field] }
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

fn to_doc<T: Entity>(entity: &T) -> RepositoryResult<Document> {
    Ok(bson::to_document(entity)?)
}

fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_document()?.get(part)?;
    }
    Some(current)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn values_equal(stored: Option<&Bson>, expected: &Bson) -> bool {
    match (stored, expected) {
        (None, Bson::Null) => true,
        (None, _) => false,
        (Some(stored), expected) => match (as_number(stored), as_number(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => stored == expected,
        },
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| values_equal(lookup(doc, key), expected))
}

impl<T: Entity> InMemoryRepository<T> {
    fn check_unique(&self, items: &[T], candidate: &T) -> RepositoryResult<()> {
        let candidate_doc = to_doc(candidate)?;
        for field in &self.unique_fields {
            let Some(value) = candidate_doc.get(*field) else { continue };
            for existing in items {
                if existing.id() == candidate.id() {
                    continue;
                }
                if to_doc(existing)?.get(*field) == Some(value) {
                    return Err(RepositoryError::already_exists(format!("E11000 duplicate key: {}", field)));
                }
            }
        }
        Ok(())
    }

    fn filtered(&self, filter: &Document) -> RepositoryResult<Vec<T>> {
        let items = self.items.lock().unwrap();
        let mut found = Vec::new();
        for item in items.iter() {
            if matches(&to_doc(item)?, filter) {
                found.push(item.clone());
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn insert(&self, mut entity: T) -> RepositoryResult<T> {
        if entity.id().is_none() {
            entity.set_id(ObjectId::new());
        }
        let now = chrono::Utc::now().to_rfc3339();
        entity.set_timestamps(Some(now.clone()), now);

        let mut items = self.items.lock().unwrap();
        self.check_unique(&items, &entity)?;
        items.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<T>> {
        let items = self.items.lock().unwrap();
        Ok(items.iter().find(|item| item.id().as_ref() == Some(id)).cloned())
    }

    async fn find_one(&self, filter: Document) -> RepositoryResult<Option<T>> {
        Ok(self.filtered(&filter)?.into_iter().next())
    }

    async fn find_many(&self, filter: Document, order: SortOrder, page: Option<Page>) -> RepositoryResult<Vec<T>> {
        let mut found = self.filtered(&filter)?;
        if order == SortOrder::NewestFirst {
            found.reverse();
        }
        if let Some(page) = page {
            found = found.into_iter().skip(page.skip() as usize).take(page.limit as usize).collect();
        }
        Ok(found)
    }

    async fn replace(&self, mut entity: T) -> RepositoryResult<T> {
        let id = entity.id().ok_or_else(|| RepositoryError::validation("Cannot replace a document without _id"))?;
        entity.set_timestamps(None, chrono::Utc::now().to_rfc3339());

        let mut items = self.items.lock().unwrap();
        self.check_unique(&items, &entity)?;
        let slot = items
            .iter_mut()
            .find(|item| item.id() == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("No document in {} with ID: {}", T::COLLECTION, id)))?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id().as_ref() != Some(id));
        if items.len() == before {
            return Err(RepositoryError::not_found(format!("No document in {} with ID: {}", T::COLLECTION, id)));
        }
        Ok(())
    }

    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        Ok(self.filtered(&filter)?.len() as u64)
    }
}

pub fn in_memory_repositories() -> Repositories {
    Repositories {
        users: Arc::new(InMemoryRepository::with_unique("email")),
        roles: Arc::new(InMemoryRepository::with_unique("name")),
        permissions: Arc::new(InMemoryRepository::with_unique("code")),
        applications: Arc::new(InMemoryRepository::with_unique("applicant_id")),
        activity_logs: Arc::new(InMemoryRepository::new()),
        documents: Arc::new(InMemoryRepository::new()),
        test_templates: Arc::new(InMemoryRepository::new()),
        tests: Arc::new(InMemoryRepository::new()),
        test_answers: Arc::new(InMemoryRepository::new()),
        interviews: Arc::new(InMemoryRepository::new()),
        evaluations: Arc::new(InMemoryRepository::new()),
        notifications: Arc::new(InMemoryRepository::new()),
    }
}

pub struct TestContext {
    pub repos: Repositories,
    pub services: Services,
}

/// Services over fresh in-memory storage with roles seeded.
pub async fn setup() -> TestContext {
    let repos = in_memory_repositories();
    let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));
    let services = Services::new(repos.clone(), jwt_utils);
    services.role.seed_defaults().await.unwrap();
    TestContext { repos, services }
}

/// Staff principal with the default grants and no stored account behind it.
pub fn admin_principal() -> Principal {
    Principal::new(
        ObjectId::new(),
        "admin@university.edu",
        UserRole::OasStaff,
        Permission::defaults_for(UserRole::OasStaff),
    )
}

impl TestContext {
    /// Applicants go through self-registration, every other role is created by staff.
    pub async fn create_user(&self, role: UserRole, name: &str) -> UserWithoutPassword {
        let email = format!("{}@university.edu", name);
        if role == UserRole::Applicant {
            let request = RegisterRequest {
                username: name.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email,
                password: TEST_PASSWORD.to_string(),
            };
            return self.services.user.register(request).await.unwrap().user;
        }
        let request = CreateUserRequest {
            username: name.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email,
            password: TEST_PASSWORD.to_string(),
            role,
        };
        self.services.user.create_user(&admin_principal(), request).await.unwrap()
    }

    /// A stored user of `role` plus the principal the auth layer would build for it.
    pub async fn principal(&self, role: UserRole, name: &str) -> Principal {
        let user = self.create_user(role, name).await;
        let permissions = self.services.role.permissions_for(role).await.unwrap();
        Principal::new(user.id.unwrap(), user.email, role, permissions)
    }

    pub async fn stored_user(&self, id: &ObjectId) -> User {
        self.repos.users.find_by_id(id).await.unwrap().unwrap()
    }
}

/// One request through the router, returning the status and the JSON body (or `Null`).
pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["tokens"]["access_token"].as_str().unwrap().to_string()
}

/// Hex id of a serialized entity (`{"_id": {"$oid": ..}}`).
pub fn oid(value: &Value) -> String {
    value["_id"]["$oid"].as_str().unwrap().to_string()
}

pub fn principal_without(principal: &Principal, permission: Permission) -> Principal {
    let mut stripped = principal.clone();
    stripped.permissions.remove(&permission);
    stripped
}

pub fn sample_application() -> ApplicationFormRequest {
    ApplicationFormRequest {
        personal: PersonalInformation {
            first_name: "Maria".to_string(),
            middle_name: Some("Santos".to_string()),
            last_name: "Cruz".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2005, 3, 14).unwrap(),
            birth_place: "Quezon City".to_string(),
            gender: "female".to_string(),
            civil_status: "single".to_string(),
            nationality: "Filipino".to_string(),
            religion: None,
            contact_number: "09171234567".to_string(),
            email: "maria.cruz@university.edu".to_string(),
            permanent_address: "123 Rizal St, Quezon City".to_string(),
            present_address: None,
        },
        family: FamilyBackground {
            father: Some(ParentInformation {
                name: "Jose Cruz".to_string(),
                occupation: Some("Driver".to_string()),
                contact_number: None,
                deceased: false,
            }),
            mother: None,
            guardian: None,
            monthly_family_income: 12000.0,
            siblings: vec![],
        },
        education: EducationalBackground {
            senior_high_school: SecondaryEducation {
                school_name: "Quezon City Science High School".to_string(),
                school_address: None,
                year_graduated: 2023,
                general_average: 92.5,
            },
            intended_course: "BS Computer Science".to_string(),
            year_level: 1,
            college_records: vec![],
        },
        organizations: vec![],
        references: vec![CharacterReference {
            name: "Prof. Ana Reyes".to_string(),
            relationship: "Adviser".to_string(),
            contact_number: "09181234567".to_string(),
            address: None,
        }],
    }
}
