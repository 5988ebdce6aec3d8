//! In-memory store, used by tests and as the fallback when the store file
//! cannot be opened at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ark_models::{LibraryItem, NewLibraryItem, UserId, UserPatch, UserRecord};

use crate::traits::{recent_first, LibraryStore, UserStore};
use crate::Result;

/// Volatile store; everything is lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
    library: Arc<RwLock<Vec<LibraryItem>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored library items.
    pub async fn library_len(&self) -> usize {
        self.library.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn upsert(&self, id: UserId, patch: UserPatch) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        let record = match users.get_mut(&id) {
            Some(existing) => {
                existing.apply(&patch);
                existing.clone()
            }
            None => {
                let record = patch.into_record(id);
                users.insert(id, record.clone());
                record
            }
        };
        Ok(record)
    }

    async fn create_if_absent(&self, id: UserId, name: &str) -> Result<(UserRecord, bool)> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.get(&id) {
            return Ok((existing.clone(), false));
        }
        let record = UserPatch::joined_now(name).into_record(id);
        users.insert(id, record.clone());
        Ok((record, true))
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn create(&self, item: NewLibraryItem) -> Result<LibraryItem> {
        let item = item.into_item();
        self.library.write().await.push(item.clone());
        Ok(item)
    }

    async fn list_recent_first(&self, limit: Option<usize>) -> Result<Vec<LibraryItem>> {
        Ok(recent_first(&self.library.read().await, limit))
    }
}
