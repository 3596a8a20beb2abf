use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{
    FIELD_AVATAR, FIELD_AVATAR_BASE64, FIELD_AVATAR_HASH, FIELD_EMAIL, FIELD_EXTERNAL_ID,
    FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_USER_ID,
};
use crate::models::{NewUser, User};

/// User document stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Identity-provider key; written by other systems, never mapped onto [`User`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl UserDocument {
    /// Build an unsaved document from creation input, stamped with `now`.
    pub fn from_new_user(user: &NewUser, now: DateTime) -> Self {
        Self {
            id: None,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            avatar_hash: user.avatar_hash.clone(),
            avatar_base64: user.avatar_base64.clone(),
            user_id: user.user_id.clone(),
            external_id: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Mutable access to a string field by key. `None` for the required
    /// name/email fields, which are never unset.
    pub(crate) fn optional_field_mut(&mut self, field: UserField) -> Option<&mut Option<String>> {
        match field {
            UserField::Avatar => Some(&mut self.avatar),
            UserField::AvatarHash => Some(&mut self.avatar_hash),
            UserField::AvatarBase64 => Some(&mut self.avatar_base64),
            UserField::UserId => Some(&mut self.user_id),
            UserField::ExternalId => Some(&mut self.external_id),
            UserField::FirstName | UserField::LastName | UserField::Email => None,
        }
    }

    pub(crate) fn set_field(&mut self, field: UserField, value: String) {
        match field {
            UserField::FirstName => self.first_name = value,
            UserField::LastName => self.last_name = value,
            UserField::Email => self.email = value,
            other => {
                if let Some(slot) = self.optional_field_mut(other) {
                    *slot = Some(value);
                }
            }
        }
    }

    pub(crate) fn unset_field(&mut self, field: UserField) {
        match field {
            UserField::FirstName => self.first_name.clear(),
            UserField::LastName => self.last_name.clear(),
            UserField::Email => self.email.clear(),
            other => {
                if let Some(slot) = self.optional_field_mut(other) {
                    *slot = None;
                }
            }
        }
    }
}

/// Mutable keys of a [`UserDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    FirstName,
    LastName,
    Email,
    Avatar,
    AvatarHash,
    AvatarBase64,
    UserId,
    ExternalId,
}

impl UserField {
    /// Key under which the field is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::FirstName => FIELD_FIRST_NAME,
            UserField::LastName => FIELD_LAST_NAME,
            UserField::Email => FIELD_EMAIL,
            UserField::Avatar => FIELD_AVATAR,
            UserField::AvatarHash => FIELD_AVATAR_HASH,
            UserField::AvatarBase64 => FIELD_AVATAR_BASE64,
            UserField::UserId => FIELD_USER_ID,
            UserField::ExternalId => FIELD_EXTERNAL_ID,
        }
    }
}

/// Empty strings are stored by some writers in place of a missing value.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        Self {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: document.first_name,
            last_name: document.last_name,
            email: document.email,
            avatar: non_empty(document.avatar),
            avatar_hash: non_empty(document.avatar_hash),
            avatar_base64: non_empty(document.avatar_base64),
            user_id: non_empty(document.user_id),
        }
    }
}
