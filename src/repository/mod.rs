pub mod repository_error;
pub mod mongo_repo;

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};

use crate::model::Entity;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

pub use mongo_repo::MongoRepository;

pub type SharedRepository<T> = std::sync::Arc<dyn Repository<T>>;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Page {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(None, None)
    }
}

/// Ordering by insertion (`_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

/// Storage operations shared by every collection.
///
/// Filters are plain equality documents (`{ field: value }`).
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Assigns `_id` when absent and stamps both timestamps.
    async fn insert(&self, entity: T) -> RepositoryResult<T>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<T>>;
    async fn find_one(&self, filter: Document) -> RepositoryResult<Option<T>>;
    async fn find_many(&self, filter: Document, order: SortOrder, page: Option<Page>) -> RepositoryResult<Vec<T>>;
    /// Replaces the stored record with the same `_id`, refreshing `updated_at`.
    async fn replace(&self, entity: T) -> RepositoryResult<T>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
    async fn count(&self, filter: Document) -> RepositoryResult<u64>;

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<T> {
        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::not_found(format!("No document in {} with ID: {}", T::COLLECTION, id))
        })
    }
}
