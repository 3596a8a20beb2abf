//! In-process implementation of [`UserStore`].
//!
//! Documents live in a vector guarded by an async `RwLock`, so `find_all`
//! yields insertion order and filtered operations act on the first match,
//! the same way a collection scan without a sort would.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::RwLock;

use crate::errors::RepositoryError;
use crate::models::UserDocument;
use crate::repositories::store::{UserChanges, UserFilter, UserStore};

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    documents: Arc<RwLock<Vec<UserDocument>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw documents, e.g. ones carrying an `externalId`
    /// written by another system. Documents without an id get one.
    pub fn with_documents(documents: impl IntoIterator<Item = UserDocument>) -> Self {
        let documents = documents
            .into_iter()
            .map(|mut document| {
                document.id.get_or_insert_with(ObjectId::new);
                document
            })
            .collect();

        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, mut document: UserDocument) -> Result<UserDocument, RepositoryError> {
        let id = *document.id.get_or_insert_with(ObjectId::new);
        debug!("Store: Inserting user document {}", id);
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn find_all(&self) -> Result<Vec<UserDocument>, RepositoryError> {
        Ok(self.documents.read().await.clone())
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<UserDocument>, RepositoryError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|document| filter.matches(document))
            .cloned())
    }

    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> Result<Option<UserDocument>, RepositoryError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .iter_mut()
            .find(|document| filter.matches(document))
            .map(|document| {
                changes.apply(document, DateTime::now());
                document.clone()
            }))
    }

    async fn find_one_and_delete(
        &self,
        filter: &UserFilter,
    ) -> Result<Option<UserDocument>, RepositoryError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .iter()
            .position(|document| filter.matches(document))
            .map(|index| documents.remove(index)))
    }
}
