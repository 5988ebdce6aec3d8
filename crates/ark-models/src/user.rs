//! User records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telegram user identifier.
pub type UserId = u64;

/// A user known to the bot.
///
/// Created the first time a user sends `/start`, renamed when the user
/// finishes the name-update dialogue, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// When the user first started the bot.
    pub joined: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a record for a user joining now.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            joined: Utc::now(),
        }
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(joined) = patch.joined {
            self.joined = joined;
        }
    }
}

/// Partial user record used by upserts.
///
/// Fields left as `None` keep their stored value. When the upsert creates a
/// new record, a missing name becomes empty and a missing join time becomes
/// now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub joined: Option<DateTime<Utc>>,
}

impl UserPatch {
    /// Patch that only changes the name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            joined: None,
        }
    }

    /// Patch carrying a full first-contact record.
    pub fn joined_now(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            joined: Some(Utc::now()),
        }
    }

    /// Builds the record an upsert creates when no record exists yet.
    pub fn into_record(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            name: self.name.unwrap_or_default(),
            joined: self.joined.unwrap_or_else(Utc::now),
        }
    }
}
