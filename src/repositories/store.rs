//! Persistence port for user documents.
//!
//! [`UserStore`] is the narrow set of document operations the repository
//! needs. [`UserFilter`] and [`UserChanges`] describe queries and mutations
//! once, and each store renders them in its own terms: a BSON filter/update
//! for MongoDB, a predicate and an in-place mutation for the in-memory store.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};

use crate::constants::{FIELD_EMAIL, FIELD_EXTERNAL_ID, FIELD_ID, FIELD_UPDATED_AT, FIELD_USER_ID};
use crate::errors::RepositoryError;
use crate::models::{UserDocument, UserField};

/// Selects a single user document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(ObjectId),
    UserId(String),
    Email(String),
    ExternalId(String),
}

impl UserFilter {
    pub fn to_document(&self) -> Document {
        match self {
            UserFilter::Id(id) => doc! { FIELD_ID: *id },
            UserFilter::UserId(user_id) => doc! { FIELD_USER_ID: user_id.as_str() },
            UserFilter::Email(email) => doc! { FIELD_EMAIL: email.as_str() },
            UserFilter::ExternalId(external_id) => {
                doc! { FIELD_EXTERNAL_ID: external_id.as_str() }
            }
        }
    }

    pub fn matches(&self, document: &UserDocument) -> bool {
        match self {
            UserFilter::Id(id) => document.id.as_ref() == Some(id),
            UserFilter::UserId(user_id) => document.user_id.as_deref() == Some(user_id.as_str()),
            UserFilter::Email(email) => document.email == *email,
            UserFilter::ExternalId(external_id) => {
                document.external_id.as_deref() == Some(external_id.as_str())
            }
        }
    }
}

/// Field mutations applied to one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    set: Vec<(UserField, String)>,
    unset: Vec<UserField>,
}

impl UserChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: UserField, value: impl Into<String>) -> Self {
        self.unset.retain(|f| *f != field);
        self.set.retain(|(f, _)| *f != field);
        self.set.push((field, value.into()));
        self
    }

    /// Set the field when a value is given, unset it otherwise.
    pub fn set_opt(self, field: UserField, value: Option<String>) -> Self {
        match value {
            Some(value) => self.set(field, value),
            None => self.unset(field),
        }
    }

    pub fn unset(mut self, field: UserField) -> Self {
        self.set.retain(|(f, _)| *f != field);
        if !self.unset.contains(&field) {
            self.unset.push(field);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Render as a MongoDB update document, stamping `updatedAt` with `now`.
    pub fn to_document(&self, now: DateTime) -> Document {
        let mut set = Document::new();
        for (field, value) in &self.set {
            set.insert(field.as_str(), value.as_str());
        }
        set.insert(FIELD_UPDATED_AT, now);

        let mut update = doc! { "$set": set };
        if !self.unset.is_empty() {
            let mut unset = Document::new();
            for field in &self.unset {
                unset.insert(field.as_str(), "");
            }
            update.insert("$unset", unset);
        }
        update
    }

    /// Apply in place, with the same effect as [`UserChanges::to_document`].
    pub fn apply(&self, document: &mut UserDocument, now: DateTime) {
        for (field, value) in &self.set {
            document.set_field(*field, value.clone());
        }
        for field in &self.unset {
            document.unset_field(*field);
        }
        document.updated_at = Some(now);
    }
}

/// Document operations backing [`crate::repositories::UserRepository`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new document and return it with its assigned id.
    async fn insert(&self, document: UserDocument) -> Result<UserDocument, RepositoryError>;

    /// All documents, in the order the store yields them.
    async fn find_all(&self) -> Result<Vec<UserDocument>, RepositoryError>;

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<UserDocument>, RepositoryError>;

    /// Apply `changes` to the first match and return the post-update document.
    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> Result<Option<UserDocument>, RepositoryError>;

    /// Remove the first match and return it.
    async fn find_one_and_delete(
        &self,
        filter: &UserFilter,
    ) -> Result<Option<UserDocument>, RepositoryError>;
}
