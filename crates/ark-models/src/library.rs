//! Library items submitted through the add-link dialogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored library link. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A library link that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLibraryItem {
    pub title: String,
    pub url: String,
}

impl NewLibraryItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Stamps the item with the current time.
    pub fn into_item(self) -> LibraryItem {
        LibraryItem {
            title: self.title,
            url: self.url,
            created_at: Utc::now(),
        }
    }
}
