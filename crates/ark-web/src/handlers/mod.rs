//! HTTP request handlers.

pub mod health;
pub mod library;
pub mod pages;

pub use health::*;
pub use library::*;
pub use pages::*;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use ark_persistence::MemoryStore;

    use crate::config::WebConfig;
    use crate::state::WebState;

    pub fn make_test_state() -> (WebState, MemoryStore) {
        let store = MemoryStore::new();
        let state = WebState::new(
            WebConfig::default().with_message("Test message"),
            Arc::new(store.clone()),
        );
        (state, store)
    }
}
