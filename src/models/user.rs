use serde::{Deserialize, Serialize};

/// User as seen by business logic, independent of the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier (hex ObjectId)
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Avatar URL or reference
    pub avatar: Option<String>,
    /// Content fingerprint of the avatar image
    pub avatar_hash: Option<String>,
    /// Inline avatar image data
    pub avatar_base64: Option<String>,
    /// Application-level key used by the avatar operations
    pub user_id: Option<String>,
}

/// User fields supplied on creation; the id is assigned by the store.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatar_hash: Option<String>,
    #[serde(default)]
    pub avatar_base64: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NewUser {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Partial update of a user.
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Option<String>>,
    pub avatar_hash: Option<Option<String>>,
    pub avatar_base64: Option<Option<String>>,
    pub user_id: Option<Option<String>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == UserUpdate::default()
    }
}
