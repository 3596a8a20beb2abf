//! Stored document key names.

pub const FIELD_ID: &str = "_id";
pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_AVATAR: &str = "avatar";
pub const FIELD_AVATAR_HASH: &str = "avatarHash";
pub const FIELD_AVATAR_BASE64: &str = "avatarBase64";
pub const FIELD_USER_ID: &str = "userId";
pub const FIELD_EXTERNAL_ID: &str = "externalId";
pub const FIELD_UPDATED_AT: &str = "updatedAt";
