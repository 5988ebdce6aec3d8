//! Store trait definitions.

use async_trait::async_trait;

use ark_models::{LibraryItem, NewLibraryItem, UserId, UserPatch, UserRecord};

use crate::Result;

/// Mapping from Telegram user id to user record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user. A missing record is `Ok(None)`, not an error.
    async fn get(&self, id: UserId) -> Result<Option<UserRecord>>;

    /// Applies `patch` to the user, creating the record if it does not exist.
    /// Returns the stored record.
    async fn upsert(&self, id: UserId, patch: UserPatch) -> Result<UserRecord>;

    /// Creates `{id, name, joined: now}` unless a record already exists, in
    /// one step under the store's lock. Returns the stored record and whether
    /// it was created by this call.
    async fn create_if_absent(&self, id: UserId, name: &str) -> Result<(UserRecord, bool)>;
}

/// Append-only collection of library links.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Stores a new item stamped with the current time.
    async fn create(&self, item: NewLibraryItem) -> Result<LibraryItem>;

    /// Lists items newest first, at most `limit` of them when given.
    async fn list_recent_first(&self, limit: Option<usize>) -> Result<Vec<LibraryItem>>;
}

/// Orders items newest first. Items created at the same instant keep their
/// reverse insertion order.
pub(crate) fn recent_first(items: &[LibraryItem], limit: Option<usize>) -> Vec<LibraryItem> {
    let mut sorted: Vec<LibraryItem> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = limit {
        sorted.truncate(limit);
    }
    sorted
}
