//! MongoDB-backed user repository.
//!
//! Translates between the [`models::User`] domain entity and the user
//! documents of a MongoDB collection. See [`repositories::UserRepository`].

pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod utils;

pub use errors::RepositoryError;
pub use models::{NewUser, User, UserUpdate};
pub use repositories::UserRepository;
