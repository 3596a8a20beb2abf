//! Error message constants.

/// Message prefix for a user lookup that resolved to nothing.
pub const ERR_USER_WITH_ID: &str = "User with id";

/// Build the not-found message for the given identifier.
pub fn user_not_found_message(id: &str) -> String {
    format!("{} {} not found", ERR_USER_WITH_ID, id)
}
