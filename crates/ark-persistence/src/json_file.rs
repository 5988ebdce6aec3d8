//! Single-file JSON store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use ark_models::{LibraryItem, NewLibraryItem, UserId, UserPatch, UserRecord};

use crate::atomic::{read_json_optional, write_json};
use crate::traits::{recent_first, LibraryStore, UserStore};
use crate::{PersistenceError, Result};

/// On-disk document layout:
///
/// ```text
/// {
///   "users": [{ "id": 42, "name": "Bob", "joined": "2024-..." }],
///   "libraryItems": [{ "title": "...", "url": "...", "createdAt": "2024-..." }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub library_items: Vec<LibraryItem>,
}

/// Store backed by one JSON file.
///
/// The whole document is cached in memory. Each write builds the next
/// document, replaces the file atomically, and only then swaps the cache, so
/// a failed write leaves both the file and the cache at the previous version.
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<StoreDocument>,
}

impl JsonFileStore {
    /// Opens the store, starting from an empty document if the file does not
    /// exist yet. The file is not created until the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc: StoreDocument = read_json_optional(&path)?.unwrap_or_default();
        info!(
            path = %path.display(),
            users = doc.users.len(),
            library_items = doc.library_items.len(),
            "Opened JSON store"
        );
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn commit<T>(&self, change: impl FnOnce(&mut StoreDocument) -> T) -> Result<T> {
        let mut doc = self.doc.lock().await;
        let mut next = doc.clone();
        let out = change(&mut next);
        *doc = self.write_document(next).await?;
        Ok(out)
    }

    /// Writes `next` on the blocking pool and hands it back once it is on
    /// disk. The caller keeps the document lock for the whole write.
    async fn write_document(&self, next: StoreDocument) -> Result<StoreDocument> {
        let path = self.path.clone();
        let written = tokio::task::spawn_blocking(move || write_json(&path, &next).map(|()| next))
            .await
            .map_err(|e| PersistenceError::Unavailable(format!("store writer failed: {e}")))??;
        debug!(path = %self.path.display(), "Store file written");
        Ok(written)
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn get(&self, id: UserId) -> Result<Option<UserRecord>> {
        let doc = self.doc.lock().await;
        Ok(doc.users.iter().find(|u| u.id == id).cloned())
    }

    async fn upsert(&self, id: UserId, patch: UserPatch) -> Result<UserRecord> {
        self.commit(|doc| match doc.users.iter_mut().find(|u| u.id == id) {
            Some(existing) => {
                existing.apply(&patch);
                existing.clone()
            }
            None => {
                let record = patch.into_record(id);
                doc.users.push(record.clone());
                record
            }
        })
        .await
    }

    async fn create_if_absent(&self, id: UserId, name: &str) -> Result<(UserRecord, bool)> {
        let mut doc = self.doc.lock().await;
        if let Some(existing) = doc.users.iter().find(|u| u.id == id) {
            return Ok((existing.clone(), false));
        }
        let record = UserPatch::joined_now(name).into_record(id);
        let mut next = doc.clone();
        next.users.push(record.clone());
        *doc = self.write_document(next).await?;
        Ok((record, true))
    }
}

#[async_trait]
impl LibraryStore for JsonFileStore {
    async fn create(&self, item: NewLibraryItem) -> Result<LibraryItem> {
        let item = item.into_item();
        self.commit(|doc| {
            doc.library_items.push(item.clone());
            item
        })
        .await
    }

    async fn list_recent_first(&self, limit: Option<usize>) -> Result<Vec<LibraryItem>> {
        let doc = self.doc.lock().await;
        Ok(recent_first(&doc.library_items, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).unwrap();

        assert!(store.get(1).await.unwrap().is_none());
        assert!(store.list_recent_first(None).await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.upsert(42, UserPatch::joined_now("Bob")).await.unwrap();
            store.upsert(42, UserPatch::name("Alice")).await.unwrap();
            store
                .create(NewLibraryItem::new("Article 1", "http://x"))
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        let user = reopened.get(42).await.unwrap().unwrap();
        assert_eq!(user.name, "Alice");

        let items = reopened.list_recent_first(None).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Article 1");
        assert_eq!(items[0].url, "http://x");
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.upsert(7, UserPatch::joined_now("Eve")).await.unwrap();
        store.create(NewLibraryItem::new("t", "u")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["users"][0]["id"], 7);
        assert_eq!(raw["users"][0]["name"], "Eve");
        assert!(raw["users"][0]["joined"].is_string());
        assert_eq!(raw["libraryItems"][0]["title"], "t");
        assert!(raw["libraryItems"][0]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_reads_users_only_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"users":[{"id":1,"name":"Ann","joined":"2024-05-01T10:00:00Z"}]}"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(1).await.unwrap().unwrap().name, "Ann");
        assert!(store.list_recent_first(None).await.unwrap().is_empty());
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ broken").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PersistenceError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the final rename fail.
        let path = dir.path().join("db.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let store = JsonFileStore {
            path: path.clone(),
            doc: Mutex::new(StoreDocument::default()),
        };

        let result = store.create(NewLibraryItem::new("t", "u")).await;
        assert!(result.is_err());
        assert!(store.list_recent_first(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_if_absent_persists_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = JsonFileStore::open(&path).unwrap();

        let (first, created) = store.create_if_absent(42, "Bob").await.unwrap();
        assert!(created);
        let on_disk = std::fs::read_to_string(&path).unwrap();

        let (second, created) = store.create_if_absent(42, "Robert").await.unwrap();
        assert!(!created);
        assert_eq!(second, first);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(42).await.unwrap().unwrap().name, "Bob");
    }

    #[tokio::test]
    async fn test_failed_create_if_absent_stores_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let store = JsonFileStore {
            path: path.clone(),
            doc: Mutex::new(StoreDocument::default()),
        };

        assert!(store.create_if_absent(42, "Bob").await.is_err());
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_reach_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = std::sync::Arc::new(JsonFileStore::open(&path).unwrap());

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(NewLibraryItem::new(format!("t{i}"), format!("http://{i}")))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.list_recent_first(None).await.unwrap().len(), 10);
    }
}
