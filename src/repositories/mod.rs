//! Repository layer for user persistence.
//!
//! [`UserRepository`] maps stored documents to domain users on top of a
//! [`UserStore`]: [`MongoUserStore`] in production, [`InMemoryUserStore`] in
//! tests and tools that run without a database.

pub mod memory_store;
pub mod mongo_store;
pub mod store;
pub mod user_repository;

pub use memory_store::InMemoryUserStore;
pub use mongo_store::MongoUserStore;
pub use store::{UserChanges, UserFilter, UserStore};
pub use user_repository::UserRepository;
