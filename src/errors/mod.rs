use thiserror::Error;

use crate::constants::{user_not_found_message, CODE_USER_NOT_FOUND};

/// Errors surfaced by the user repository.
///
/// Lookups report a missing user as `Ok(None)`; only the avatar mutations turn
/// a miss into [`RepositoryError::NotFound`]. Anything the store reports is
/// passed through untouched as [`RepositoryError::Storage`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not Found [{code}]: {message}")]
    NotFound { code: String, message: String },

    #[error(transparent)]
    Storage(#[from] mongodb::error::Error),
}

impl RepositoryError {
    pub fn user_not_found(id: &str) -> Self {
        RepositoryError::NotFound {
            code: CODE_USER_NOT_FOUND.to_string(),
            message: user_not_found_message(id),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}
