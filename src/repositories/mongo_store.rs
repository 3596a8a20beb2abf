//! MongoDB implementation of [`UserStore`].

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database, IndexModel};

use crate::config::CONFIG;
use crate::constants::{FIELD_EMAIL, FIELD_EXTERNAL_ID, FIELD_USER_ID};
use crate::errors::RepositoryError;
use crate::models::UserDocument;
use crate::repositories::store::{UserChanges, UserFilter, UserStore};

/// User documents held in a MongoDB collection.
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Use the configured users collection of `db`.
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db.collection(&CONFIG.users_collection))
    }

    pub fn with_collection(collection: Collection<UserDocument>) -> Self {
        Self { collection }
    }

    /// Create indexes for the lookup keys.
    ///
    /// Call once during startup. None of them is unique: uniqueness of
    /// `email`, `userId` and `externalId` is owned by whoever writes them.
    pub async fn create_indexes(&self) -> Result<(), RepositoryError> {
        info!(
            "Creating database indexes for {} collection...",
            self.collection.name()
        );

        let indexes = vec![
            IndexModel::builder().keys(doc! { FIELD_EMAIL: 1 }).build(),
            IndexModel::builder().keys(doc! { FIELD_USER_ID: 1 }).build(),
            IndexModel::builder()
                .keys(doc! { FIELD_EXTERNAL_ID: 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        info!("Database indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, mut document: UserDocument) -> Result<UserDocument, RepositoryError> {
        let id = *document.id.get_or_insert_with(ObjectId::new);
        debug!("Store: Inserting user document {}", id);
        self.collection.insert_one(&document).await?;
        Ok(document)
    }

    async fn find_all(&self) -> Result<Vec<UserDocument>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<UserDocument>, RepositoryError> {
        Ok(self.collection.find_one(filter.to_document()).await?)
    }

    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> Result<Option<UserDocument>, RepositoryError> {
        Ok(self
            .collection
            .find_one_and_update(filter.to_document(), changes.to_document(DateTime::now()))
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_one_and_delete(
        &self,
        filter: &UserFilter,
    ) -> Result<Option<UserDocument>, RepositoryError> {
        Ok(self
            .collection
            .find_one_and_delete(filter.to_document())
            .await?)
    }
}
