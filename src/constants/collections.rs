//! MongoDB collection names.

/// Default collection holding user documents.
pub const COLLECTION_USERS: &str = "users";
