use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use tracing::{debug, error, info};

use crate::model::Entity;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::{Page, Repository, SortOrder};

pub struct MongoRepository<T: Entity> {
    collection: Collection<T>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(db: &Database) -> Self {
        MongoRepository { collection: db.collection::<T>(T::COLLECTION) }
    }

    /// Create a unique ascending index on `field` if it does not exist yet.
    pub async fn ensure_unique_index(&self, field: &str) -> RepositoryResult<()> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(model, None).await?;
        info!(collection = T::COLLECTION, field, "Unique index ensured");
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MongoRepository<T> {
    #[tracing::instrument(skip(self, entity), fields(collection = T::COLLECTION))]
    async fn insert(&self, mut entity: T) -> RepositoryResult<T> {
        if entity.id().is_none() {
            entity.set_id(ObjectId::new());
        }
        let now = chrono::Utc::now().to_rfc3339();
        entity.set_timestamps(Some(now.clone()), now);

        match self.collection.insert_one(&entity, None).await {
            Ok(_) => {
                debug!("Document inserted");
                Ok(entity)
            }
            Err(e) => {
                error!("Failed to insert document: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION, id = %id))]
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<T>> {
        self.find_one(doc! { "_id": *id }).await
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_one(&self, filter: Document) -> RepositoryResult<Option<T>> {
        self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to find document: {}", e);
            RepositoryError::database(format!("Failed to find document in {}: {}", T::COLLECTION, e))
        })
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_many(&self, filter: Document, order: SortOrder, page: Option<Page>) -> RepositoryResult<Vec<T>> {
        let direction = match order {
            SortOrder::OldestFirst => 1,
            SortOrder::NewestFirst => -1,
        };
        let mut options = FindOptions::builder().sort(doc! { "_id": direction }).build();
        if let Some(page) = page {
            options.skip = Some(page.skip());
            options.limit = Some(i64::from(page.limit));
        }

        let cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to query documents: {}", e);
            RepositoryError::database(format!("Failed to query {}: {}", T::COLLECTION, e))
        })?;
        let documents: Vec<T> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to deserialize documents: {}", e);
            RepositoryError::serialization(format!("Failed to read {}: {}", T::COLLECTION, e))
        })?;
        debug!("Fetched {} documents", documents.len());
        Ok(documents)
    }

    #[tracing::instrument(skip(self, entity), fields(collection = T::COLLECTION))]
    async fn replace(&self, mut entity: T) -> RepositoryResult<T> {
        let id = entity.id().ok_or_else(|| RepositoryError::validation("Cannot replace a document without _id"))?;
        entity.set_timestamps(None, chrono::Utc::now().to_rfc3339());

        let result = self.collection.replace_one(doc! { "_id": id }, &entity, None).await?;
        if result.matched_count == 0 {
            error!("No document found to replace for ID: {}", id);
            return Err(RepositoryError::not_found(format!("No document in {} with ID: {}", T::COLLECTION, id)));
        }
        Ok(entity)
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION, id = %id))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let result = self.collection.delete_one(doc! { "_id": *id }, None).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::not_found(format!("No document in {} with ID: {}", T::COLLECTION, id)));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        self.collection.count_documents(filter, None).await.map_err(|e| {
            error!("Failed to count documents: {}", e);
            RepositoryError::database(format!("Failed to count {}: {}", T::COLLECTION, e))
        })
    }
}
