//! User repository mapping stored user documents to domain users.
//!
//! Every method issues exactly one store operation. Lookups report a missing
//! user as `None`; the avatar mutations report it as
//! [`RepositoryError::NotFound`]. Store errors are propagated as they are.

use std::sync::Arc;

use log::{debug, info, warn};
use mongodb::bson::{oid::ObjectId, DateTime};
use mongodb::Database;

use crate::errors::RepositoryError;
use crate::models::{NewUser, User, UserDocument, UserField, UserUpdate};
use crate::repositories::mongo_store::MongoUserStore;
use crate::repositories::store::{UserChanges, UserFilter, UserStore};
use crate::utils::mask_email;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn UserStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Repository over the configured users collection of `db`.
    pub fn with_database(db: &Database) -> Self {
        Self::new(Arc::new(MongoUserStore::new(db)))
    }

    /// Insert a new user and return it with its assigned id.
    pub async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        info!("Repository: Creating user {}", mask_email(&user.email));
        let document = UserDocument::from_new_user(user, DateTime::now());
        let saved = self.store.insert(document).await?;
        Ok(saved.into())
    }

    pub async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        debug!("Repository: Finding all users");
        let documents = self.store.find_all().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        debug!("Repository: Finding user by ID: {}", id);
        let Some(object_id) = parse_id(id) else {
            return Ok(None);
        };
        self.find_one(UserFilter::Id(object_id)).await
    }

    /// Apply a partial update and return the post-update user.
    ///
    /// An empty update writes nothing and returns the current state.
    pub async fn update(
        &self,
        id: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        debug!("Repository: Updating user: {}", id);
        let Some(object_id) = parse_id(id) else {
            return Ok(None);
        };

        let changes = UserChanges::from(update);
        if changes.is_empty() {
            return self.find_one(UserFilter::Id(object_id)).await;
        }

        Ok(self
            .store
            .find_one_and_update(&UserFilter::Id(object_id), &changes)
            .await?
            .map(User::from))
    }

    /// Replace both the avatar hash and the inline avatar data.
    pub async fn update_avatar(
        &self,
        user_id: &str,
        hash: &str,
        base64: &str,
    ) -> Result<User, RepositoryError> {
        debug!("Repository: Updating avatar for user: {}", user_id);
        let changes = UserChanges::new()
            .set(UserField::AvatarHash, hash)
            .set(UserField::AvatarBase64, base64);
        self.update_by_user_id(user_id, changes).await
    }

    /// Replace the avatar hash only; the inline avatar data is left as is.
    pub async fn update_avatar_hash(
        &self,
        user_id: &str,
        hash: &str,
    ) -> Result<User, RepositoryError> {
        debug!("Repository: Updating avatar hash for user: {}", user_id);
        let changes = UserChanges::new().set(UserField::AvatarHash, hash);
        self.update_by_user_id(user_id, changes).await
    }

    /// Clear the avatar hash and the inline avatar data.
    pub async fn remove_avatar(&self, user_id: &str) -> Result<User, RepositoryError> {
        debug!("Repository: Removing avatar for user: {}", user_id);
        let changes = UserChanges::new()
            .unset(UserField::AvatarHash)
            .unset(UserField::AvatarBase64);
        self.update_by_user_id(user_id, changes).await
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, RepositoryError> {
        debug!("Repository: Finding user by user ID: {}", user_id);
        self.find_one(UserFilter::UserId(user_id.to_string())).await
    }

    /// Find a user by exact email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        debug!("Repository: Finding user by email: {}", mask_email(email));
        self.find_one(UserFilter::Email(email.to_string())).await
    }

    pub async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        debug!("Repository: Finding user by external ID: {}", external_id);
        self.find_one(UserFilter::ExternalId(external_id.to_string()))
            .await
    }

    /// Delete a user by id. Deleting a missing user is not an error.
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        debug!("Repository: Deleting user: {}", id);
        let Some(object_id) = parse_id(id) else {
            return Ok(());
        };

        if self
            .store
            .find_one_and_delete(&UserFilter::Id(object_id))
            .await?
            .is_some()
        {
            info!("Repository: Deleted user {}", id);
        }
        Ok(())
    }

    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.find_one(&filter).await?.map(User::from))
    }

    async fn update_by_user_id(
        &self,
        user_id: &str,
        changes: UserChanges,
    ) -> Result<User, RepositoryError> {
        self.store
            .find_one_and_update(&UserFilter::UserId(user_id.to_string()), &changes)
            .await?
            .map(User::from)
            .ok_or_else(|| {
                warn!("Avatar update failed: User not found with user ID: {}", user_id);
                RepositoryError::user_not_found(user_id)
            })
    }
}

/// A string that is not an ObjectId cannot name a stored document.
fn parse_id(id: &str) -> Option<ObjectId> {
    match ObjectId::parse_str(id) {
        Ok(object_id) => Some(object_id),
        Err(_) => {
            debug!("Repository: '{}' is not a valid document id", id);
            None
        }
    }
}

impl From<UserUpdate> for UserChanges {
    fn from(update: UserUpdate) -> Self {
        let mut changes = UserChanges::new();
        if let Some(first_name) = update.first_name {
            changes = changes.set(UserField::FirstName, first_name);
        }
        if let Some(last_name) = update.last_name {
            changes = changes.set(UserField::LastName, last_name);
        }
        if let Some(email) = update.email {
            changes = changes.set(UserField::Email, email);
        }
        if let Some(avatar) = update.avatar {
            changes = changes.set_opt(UserField::Avatar, avatar);
        }
        if let Some(avatar_hash) = update.avatar_hash {
            changes = changes.set_opt(UserField::AvatarHash, avatar_hash);
        }
        if let Some(avatar_base64) = update.avatar_base64 {
            changes = changes.set_opt(UserField::AvatarBase64, avatar_base64);
        }
        if let Some(user_id) = update.user_id {
            changes = changes.set_opt(UserField::UserId, user_id);
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory_store::InMemoryUserStore;

    fn repository() -> (UserRepository, InMemoryUserStore) {
        let store = InMemoryUserStore::new();
        (UserRepository::new(Arc::new(store.clone())), store)
    }

    fn new_user(email: &str, user_id: &str) -> NewUser {
        NewUser::new("A", "B", email).with_user_id(user_id)
    }

    /// Store whose every operation fails the way an unreachable server would.
    struct FailingStore;

    fn storage_error() -> RepositoryError {
        RepositoryError::Storage(mongodb::error::Error::custom("boom"))
    }

    #[async_trait::async_trait]
    impl UserStore for FailingStore {
        async fn insert(&self, _: UserDocument) -> Result<UserDocument, RepositoryError> {
            Err(storage_error())
        }

        async fn find_all(&self) -> Result<Vec<UserDocument>, RepositoryError> {
            Err(storage_error())
        }

        async fn find_one(&self, _: &UserFilter) -> Result<Option<UserDocument>, RepositoryError> {
            Err(storage_error())
        }

        async fn find_one_and_update(
            &self,
            _: &UserFilter,
            _: &UserChanges,
        ) -> Result<Option<UserDocument>, RepositoryError> {
            Err(storage_error())
        }

        async fn find_one_and_delete(
            &self,
            _: &UserFilter,
        ) -> Result<Option<UserDocument>, RepositoryError> {
            Err(storage_error())
        }
    }

    fn assert_storage_error<T: std::fmt::Debug>(result: Result<T, RepositoryError>) {
        match result {
            Err(err @ RepositoryError::Storage(_)) => assert!(!err.is_not_found()),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_errors_pass_through_unchanged() {
        let repo = UserRepository::new(Arc::new(FailingStore));
        let id = ObjectId::new().to_hex();
        let update = UserUpdate {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };

        assert_storage_error(repo.create(&new_user("a@x.com", "u1")).await);
        assert_storage_error(repo.find_all().await);
        assert_storage_error(repo.find_by_id(&id).await);
        assert_storage_error(repo.update(&id, update).await);
        assert_storage_error(repo.update(&id, UserUpdate::default()).await);
        assert_storage_error(repo.update_avatar("u1", "h", "b").await);
        assert_storage_error(repo.update_avatar_hash("u1", "h").await);
        assert_storage_error(repo.remove_avatar("u1").await);
        assert_storage_error(repo.find_by_user_id("u1").await);
        assert_storage_error(repo.find_by_email("a@x.com").await);
        assert_storage_error(repo.find_by_external_id("ext-1").await);
        assert_storage_error(repo.delete(&id).await);
    }

    #[tokio::test]
    async fn test_create_then_find_by_id_returns_same_fields() {
        let (repo, _) = repository();
        let input = NewUser {
            avatar: Some("https://cdn.example.com/a.png".to_string()),
            avatar_hash: Some("h0".to_string()),
            avatar_base64: Some("b0".to_string()),
            ..new_user("a@x.com", "u1")
        };

        let created = repo.create(&input).await.unwrap();
        assert!(!created.id.is_empty());

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.first_name, input.first_name);
        assert_eq!(found.last_name, input.last_name);
        assert_eq!(found.email, input.email);
        assert_eq!(found.avatar, input.avatar);
        assert_eq!(found.avatar_hash, input.avatar_hash);
        assert_eq!(found.avatar_base64, input.avatar_base64);
        assert_eq!(found.user_id, input.user_id);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_returns_none() {
        let (repo, _) = repository();
        let missing = ObjectId::new().to_hex();
        assert!(repo.find_by_id(&missing).await.unwrap().is_none());
        assert!(repo.find_by_id("not-an-object-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_in_insertion_order() {
        let (repo, _) = repository();
        assert!(repo.find_all().await.unwrap().is_empty());

        let first = repo.create(&new_user("a@x.com", "u1")).await.unwrap();
        let second = repo.create(&new_user("b@x.com", "u2")).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_returns_post_update_state() {
        let (repo, _) = repository();
        let created = repo
            .create(&NewUser {
                avatar: Some("old.png".to_string()),
                ..new_user("a@x.com", "u1")
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.id,
                UserUpdate {
                    first_name: Some("Ada".to_string()),
                    avatar: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "B");
        assert!(updated.avatar.is_none());
        assert_eq!(repo.find_by_id(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_or_empty() {
        let (repo, _) = repository();
        let update = UserUpdate {
            last_name: Some("Z".to_string()),
            ..Default::default()
        };
        let missing = ObjectId::new().to_hex();
        assert!(repo.update(&missing, update.clone()).await.unwrap().is_none());
        assert!(repo.update("bogus", update).await.unwrap().is_none());

        let created = repo.create(&new_user("a@x.com", "u1")).await.unwrap();
        let unchanged = repo
            .update(&created.id, UserUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged, Some(created));
    }

    #[tokio::test]
    async fn test_update_avatar_sets_hash_and_base64() {
        let (repo, _) = repository();
        repo.create(&new_user("a@x.com", "u1")).await.unwrap();

        repo.update_avatar("u1", "h", "b").await.unwrap();

        let found = repo.find_by_user_id("u1").await.unwrap().unwrap();
        assert_eq!(found.avatar_hash.as_deref(), Some("h"));
        assert_eq!(found.avatar_base64.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_update_avatar_hash_leaves_base64_untouched() {
        let (repo, _) = repository();
        repo.create(&new_user("a@x.com", "u1")).await.unwrap();
        repo.update_avatar("u1", "h1", "b64").await.unwrap();

        let updated = repo.update_avatar_hash("u1", "h2").await.unwrap();
        assert_eq!(updated.avatar_hash.as_deref(), Some("h2"));
        assert_eq!(updated.avatar_base64.as_deref(), Some("b64"));
    }

    #[tokio::test]
    async fn test_remove_avatar_clears_hash_and_base64() {
        let (repo, _) = repository();
        repo.create(&NewUser {
            avatar: Some("keep.png".to_string()),
            ..new_user("a@x.com", "u1")
        })
        .await
        .unwrap();
        repo.update_avatar("u1", "h", "b").await.unwrap();

        let updated = repo.remove_avatar("u1").await.unwrap();
        assert!(updated.avatar_hash.is_none());
        assert!(updated.avatar_base64.is_none());
        assert_eq!(updated.avatar.as_deref(), Some("keep.png"));
    }

    #[tokio::test]
    async fn test_avatar_mutations_on_missing_user_are_not_found() {
        let (repo, _) = repository();

        let results = vec![
            repo.update_avatar("ghost", "h", "b").await,
            repo.update_avatar_hash("ghost", "h").await,
            repo.remove_avatar("ghost").await,
        ];

        for result in results {
            let err = result.unwrap_err();
            assert!(err.is_not_found());
            assert!(err.to_string().contains("ghost"));
        }
    }

    #[tokio::test]
    async fn test_lookups_on_missing_values_return_none() {
        let (repo, _) = repository();
        repo.create(&new_user("a@x.com", "u1")).await.unwrap();

        assert!(repo.find_by_user_id("u2").await.unwrap().is_none());
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
        assert!(repo.find_by_external_id("ext-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_external_id_reads_store_only_field() {
        let store = InMemoryUserStore::with_documents(vec![UserDocument {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@x.com".to_string(),
            user_id: Some(String::new()),
            external_id: Some("ext-1".to_string()),
            ..Default::default()
        }]);
        let repo = UserRepository::new(Arc::new(store));

        let found = repo.find_by_external_id("ext-1").await.unwrap().unwrap();
        assert_eq!(found.email, "a@x.com");
        assert!(found.user_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (repo, store) = repository();
        let created = repo.create(&new_user("a@x.com", "u1")).await.unwrap();

        repo.delete(&created.id).await.unwrap();
        assert!(store.is_empty().await);
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());

        repo.delete(&created.id).await.unwrap();
        repo.delete("not-an-object-id").await.unwrap();
    }

    #[tokio::test]
    async fn test_avatar_lifecycle_scenario() {
        let (repo, _) = repository();

        let created = repo.create(&new_user("a@x.com", "u1")).await.unwrap();
        assert!(!created.id.is_empty());

        let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email, created);

        let user = repo.update_avatar_hash("u1", "h1").await.unwrap();
        assert_eq!(user.avatar_hash.as_deref(), Some("h1"));
        assert!(user.avatar_base64.is_none());

        let user = repo.update_avatar("u1", "h2", "b64").await.unwrap();
        assert_eq!(user.avatar_hash.as_deref(), Some("h2"));
        assert_eq!(user.avatar_base64.as_deref(), Some("b64"));

        let user = repo.remove_avatar("u1").await.unwrap();
        assert!(user.avatar_hash.is_none());
        assert!(user.avatar_base64.is_none());
        assert_eq!(user.id, created.id);
    }

    #[test]
    fn test_user_update_to_changes() {
        let changes = UserChanges::from(UserUpdate {
            email: Some("new@x.com".to_string()),
            avatar_hash: Some(None),
            user_id: Some(Some("u9".to_string())),
            ..Default::default()
        });

        let expected = UserChanges::new()
            .set(UserField::Email, "new@x.com")
            .unset(UserField::AvatarHash)
            .set(UserField::UserId, "u9");
        assert_eq!(changes, expected);
        assert!(UserChanges::from(UserUpdate::default()).is_empty());
    }
}
