//! Application state shared across handlers.

use std::sync::Arc;

use ark_persistence::LibraryStore;

use crate::config::WebConfig;

/// State shared by all web handlers.
#[derive(Clone)]
pub struct WebState {
    pub config: Arc<WebConfig>,
    /// The same library store the bot writes to.
    pub library: Arc<dyn LibraryStore>,
}

impl WebState {
    pub fn new(config: WebConfig, library: Arc<dyn LibraryStore>) -> Self {
        Self {
            config: Arc::new(config),
            library,
        }
    }
}
