//! Shared state for the bot, accessible across all handlers.

use std::sync::Arc;

use ark_persistence::{JsonFileStore, LibraryStore, MemoryStore, UserStore};
use tracing::{error, warn};
use url::Url;

use crate::config::BotConfig;
use crate::dialogue::DialogueTracker;

/// Everything a handler needs: the dialogue tracker and the two stores.
pub struct ArkState {
    tracker: DialogueTracker,
    users: Arc<dyn UserStore>,
    library: Arc<dyn LibraryStore>,
    webapp_url: Option<Url>,
}

impl ArkState {
    pub fn new(
        tracker: DialogueTracker,
        users: Arc<dyn UserStore>,
        library: Arc<dyn LibraryStore>,
        webapp_url: Option<Url>,
    ) -> Self {
        if webapp_url.is_none() {
            warn!("WEBAPP_URL not set - the Open App button will be hidden");
        }
        Self {
            tracker,
            users,
            library,
            webapp_url,
        }
    }

    /// Opens the JSON store named by the configuration.
    ///
    /// A store that cannot be opened is not fatal: the failure is logged and
    /// the bot keeps running on an in-memory store.
    pub fn open(config: &BotConfig) -> Self {
        let tracker = DialogueTracker::new(config.dialogue_timeout);

        match JsonFileStore::open(&config.data_file) {
            Ok(store) => {
                let store = Arc::new(store);
                Self::new(tracker, store.clone(), store, config.webapp_url.clone())
            }
            Err(e) => {
                error!(
                    error = %e,
                    path = %config.data_file.display(),
                    "Failed to open store, falling back to in-memory storage"
                );
                let store = Arc::new(MemoryStore::new());
                Self::new(tracker, store.clone(), store, config.webapp_url.clone())
            }
        }
    }

    pub fn tracker(&self) -> &DialogueTracker {
        &self.tracker
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// The library store, shared with the web pages.
    pub fn library(&self) -> Arc<dyn LibraryStore> {
        Arc::clone(&self.library)
    }

    pub fn webapp_url(&self) -> Option<&Url> {
        self.webapp_url.as_ref()
    }
}

/// Create a shared state wrapped in Arc for use across handlers.
pub fn create_shared_state(config: &BotConfig) -> Arc<ArkState> {
    Arc::new(ArkState::open(config))
}
