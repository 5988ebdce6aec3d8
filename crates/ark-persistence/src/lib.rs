//! Persistence layer for The Ark.
//!
//! Two collaborators back the bot: a [`UserStore`] keyed by Telegram user id
//! and an append-only [`LibraryStore`]. Both are implemented by
//! [`JsonFileStore`], which keeps a single JSON document on disk and replaces
//! it atomically on every write, and by [`MemoryStore`], which is used in
//! tests and as the degraded fallback when the file cannot be opened.
//!
//! # Example
//!
//! ```no_run
//! use ark_models::UserPatch;
//! use ark_persistence::{JsonFileStore, UserStore};
//!
//! # async fn demo() -> ark_persistence::Result<()> {
//! let store = JsonFileStore::open("/tmp/ark/db.json")?;
//! store.upsert(42, UserPatch::joined_now("Bob")).await?;
//! let user = store.get(42).await?;
//! assert_eq!(user.map(|u| u.name), Some("Bob".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod traits;

pub use error::{PersistenceError, Result};
pub use json_file::{JsonFileStore, StoreDocument};
pub use memory::MemoryStore;
pub use traits::{LibraryStore, UserStore};
