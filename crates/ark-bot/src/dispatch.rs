//! Routing of commands, button presses, and free text.
//!
//! Every entry point returns the [`Reply`] to send (or `None` for no reply)
//! instead of talking to Telegram, so the routing rules can be exercised
//! without a bot connection. [`crate::handlers`] does the sending.

use ark_models::{UserId, UserPatch};
use ark_web::pages::html_escape;
use teloxide::types::InlineKeyboardMarkup;
use tracing::{debug, error, info, warn};

use crate::dialogue::{DialogueKind, Outcome};
use crate::menu::{main_menu, MenuAction};
use crate::state::ArkState;

/// Number of links shown by `/links`.
pub const RECENT_LINKS_LIMIT: usize = 10;

/// A message for the user, in Telegram HTML.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

impl ArkState {
    /// `/start`: records a first-time user and shows the menu. An existing
    /// record is left as it is.
    pub async fn start(&self, user: UserId, display_name: &str) -> Reply {
        match self.users().create_if_absent(user, display_name).await {
            Ok((_, true)) => info!(user_id = user, name = %display_name, "User registered"),
            Ok((_, false)) => debug!(user_id = user, "User already registered"),
            Err(e) => {
                error!(user_id = user, error = %e, "Failed to register user");
                return Reply::text("❌ Could not register you. Please try /start again later.");
            }
        }

        Reply::text(format!(
            "👋 Welcome to The Ark, <b>{}</b>!\n\nChoose an option below.",
            html_escape(display_name)
        ))
        .with_keyboard(main_menu(self.webapp_url()))
    }

    /// Button press. Unknown callback data gets no reply.
    pub async fn callback(&self, user: UserId, data: &str) -> Option<Reply> {
        let Some(action) = MenuAction::parse(data) else {
            warn!(user_id = user, data = %data, "Unknown callback data");
            return None;
        };
        let reply = match action {
            MenuAction::MyInfo => self.my_info(user).await,
            MenuAction::UpdateName => self.begin_name_update(user).await,
            MenuAction::AddLink => self.begin_add_link(user).await,
        };
        Some(reply)
    }

    /// `MY_INFO`: name and join time, or "no data".
    pub async fn my_info(&self, user: UserId) -> Reply {
        match self.users().get(user).await {
            Ok(Some(record)) => Reply::text(format!(
                "👤 <b>Name:</b> {}\n📅 <b>Joined:</b> {}",
                html_escape(&record.name),
                record.joined.format("%Y-%m-%d %H:%M UTC")
            )),
            Ok(None) => Reply::text("ℹ️ No data found. Send /start first."),
            Err(e) => {
                error!(user_id = user, error = %e, "Failed to read user");
                Reply::text("❌ Could not load your data. Please try again later.")
            }
        }
    }

    /// `UPDATE_NAME`: the next message becomes the user's name.
    pub async fn begin_name_update(&self, user: UserId) -> Reply {
        self.tracker().begin(user, DialogueKind::Name).await;
        Reply::text("✏️ Send me your new name.\n\nUse /cancel to stop.")
    }

    /// `/addlink` and the Add Link button: asks for a title, then a URL.
    pub async fn begin_add_link(&self, user: UserId) -> Reply {
        self.tracker().begin(user, DialogueKind::LibraryLink).await;
        Reply::text("📚 Send the title of the library item.\n\nUse /cancel to stop.")
    }

    /// `/cancel`: drops any dialogue in progress.
    pub async fn cancel(&self, user: UserId) -> Reply {
        if self.tracker().cancel(user).await {
            Reply::text("Cancelled.")
        } else {
            Reply::text("Nothing to cancel.")
        }
    }

    /// `/links`: the most recent library items.
    pub async fn recent_links(&self) -> Reply {
        let items = match self.library().list_recent_first(Some(RECENT_LINKS_LIMIT)).await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Failed to list library items");
                return Reply::text("❌ Could not load the library. Please try again later.");
            }
        };
        if items.is_empty() {
            return Reply::text("The library is empty. Add a link with /addlink.");
        }

        let mut text = String::from("📚 <b>Recent links</b>\n");
        for (i, item) in items.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. <b>{}</b>\n{}",
                i + 1,
                html_escape(&item.title),
                html_escape(&item.url)
            ));
        }
        Reply::text(text)
    }

    /// Free text: a step input when a dialogue is active, otherwise nothing.
    ///
    /// The dialogue is already finished when the store write happens; a
    /// failed write is reported to the user and the input is dropped.
    pub async fn text(&self, user: UserId, text: &str) -> Option<Reply> {
        match self.tracker().advance(user, text).await {
            Outcome::Ignored => None,
            Outcome::Continuing => Some(Reply::text("🔗 Got it. Now send the link (URL).")),
            Outcome::NameReady(name) => {
                let reply = match self.users().upsert(user, UserPatch::name(name.as_str())).await {
                    Ok(_) => {
                        info!(user_id = user, name = %name, "Name updated");
                        Reply::text(format!("✅ Name updated to <b>{}</b>.", html_escape(&name)))
                    }
                    Err(e) => {
                        error!(user_id = user, error = %e, "Failed to update name");
                        Reply::text("❌ Could not update your name. Please try again later.")
                    }
                };
                Some(reply)
            }
            Outcome::LibraryItemReady(item) => {
                let reply = match self.library().create(item).await {
                    Ok(stored) => {
                        info!(user_id = user, title = %stored.title, url = %stored.url, "Library item added");
                        Reply::text(format!(
                            "✅ Added <b>{}</b> to the library.",
                            html_escape(&stored.title)
                        ))
                    }
                    Err(e) => {
                        error!(user_id = user, error = %e, "Failed to save library item");
                        Reply::text("❌ Could not save the link. Please try again later.")
                    }
                };
                Some(reply)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ark_models::UserRecord;
    use ark_persistence::{MemoryStore, PersistenceError, UserStore};

    use crate::dialogue::{DialogueState, DialogueTracker, LinkStep};

    fn make_state() -> (ArkState, MemoryStore) {
        let store = MemoryStore::new();
        let state = ArkState::new(
            DialogueTracker::default(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            None,
        );
        (state, store)
    }

    #[tokio::test]
    async fn test_start_registers_and_shows_menu() {
        let (state, store) = make_state();

        let reply = state.start(42, "Bob").await;
        assert!(reply.text.contains("Bob"));
        assert!(reply.keyboard.is_some());

        let record = store.get(42).await.unwrap().unwrap();
        assert_eq!(record.name, "Bob");
    }

    /// User store that cannot be reached.
    struct UnreachableUsers;

    #[async_trait::async_trait]
    impl UserStore for UnreachableUsers {
        async fn get(&self, _id: UserId) -> ark_persistence::Result<Option<UserRecord>> {
            Err(PersistenceError::Unavailable("offline".to_string()))
        }

        async fn upsert(&self, _id: UserId, _patch: UserPatch) -> ark_persistence::Result<UserRecord> {
            Err(PersistenceError::Unavailable("offline".to_string()))
        }

        async fn create_if_absent(
            &self,
            _id: UserId,
            _name: &str,
        ) -> ark_persistence::Result<(UserRecord, bool)> {
            Err(PersistenceError::Unavailable("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_start_reports_failed_registration() {
        let state = ArkState::new(
            DialogueTracker::default(),
            Arc::new(UnreachableUsers),
            Arc::new(MemoryStore::new()),
            None,
        );

        let reply = state.start(42, "Bob").await;

        assert!(reply.text.contains("Could not register"));
        assert!(!reply.text.contains("Welcome"));
        assert!(reply.keyboard.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_starts_register_once() {
        let (state, store) = make_state();
        let state = Arc::new(state);

        let first = tokio::spawn({
            let state = Arc::clone(&state);
            async move { state.start(42, "Bob").await }
        });
        let second = tokio::spawn({
            let state = Arc::clone(&state);
            async move { state.start(42, "Bobby").await }
        });
        first.await.unwrap();
        second.await.unwrap();

        let record = store.get(42).await.unwrap().unwrap();
        let (again, created) = store.create_if_absent(42, "Other").await.unwrap();
        assert!(!created);
        assert_eq!(again, record);
    }

    #[tokio::test]
    async fn test_start_does_not_overwrite_existing_user() {
        let (state, store) = make_state();
        state.start(42, "Bob").await;
        store.upsert(42, UserPatch::name("Alice")).await.unwrap();
        let joined = store.get(42).await.unwrap().unwrap().joined;

        state.start(42, "Bob").await;

        let record = store.get(42).await.unwrap().unwrap();
        assert_eq!(record.name, "Alice");
        assert_eq!(record.joined, joined);
    }

    #[tokio::test]
    async fn test_start_escapes_display_name() {
        let (state, _) = make_state();
        let reply = state.start(1, "<Bob & Co>").await;
        assert!(reply.text.contains("&lt;Bob &amp; Co&gt;"));
    }

    #[tokio::test]
    async fn test_my_info_without_record() {
        let (state, _) = make_state();
        let reply = state.callback(7, "MY_INFO").await.unwrap();
        assert!(reply.text.contains("No data"));
    }

    #[tokio::test]
    async fn test_unknown_callback_has_no_reply() {
        let (state, _) = make_state();
        assert!(state.callback(7, "SOMETHING_ELSE").await.is_none());
    }

    #[tokio::test]
    async fn test_name_update_flow() {
        let (state, _) = make_state();
        state.start(42, "Bob").await;

        state.callback(42, "UPDATE_NAME").await.unwrap();
        assert_eq!(state.tracker().state(42).await, DialogueState::AwaitingName);

        let reply = state.text(42, "Alice").await.unwrap();
        assert!(reply.text.contains("Alice"));
        assert!(state.tracker().state(42).await.is_idle());

        let info = state.callback(42, "MY_INFO").await.unwrap();
        assert!(info.text.contains("Alice"));
    }

    #[tokio::test]
    async fn test_add_link_button_starts_dialogue() {
        let (state, _) = make_state();
        state.callback(1, "ADD_LINK").await.unwrap();
        assert_eq!(
            state.tracker().state(1).await,
            DialogueState::AwaitingLibraryLink {
                step: LinkStep::Title,
                title: None,
            }
        );
    }

    #[tokio::test]
    async fn test_text_without_dialogue_is_silent() {
        let (state, store) = make_state();
        assert!(state.text(1, "hello").await.is_none());
        assert_eq!(store.library_len().await, 0);
    }

    #[tokio::test]
    async fn test_add_link_flow_stores_item() {
        let (state, store) = make_state();
        state.begin_add_link(1).await;

        let reply = state.text(1, "Article 1").await.unwrap();
        assert!(reply.text.contains("link"));
        assert_eq!(store.library_len().await, 0);

        let reply = state.text(1, "http://x").await.unwrap();
        assert!(reply.text.contains("Article 1"));
        assert_eq!(store.library_len().await, 1);
    }

    #[tokio::test]
    async fn test_cancel_replies() {
        let (state, _) = make_state();
        assert_eq!(state.cancel(1).await.text, "Nothing to cancel.");

        state.begin_add_link(1).await;
        assert_eq!(state.cancel(1).await.text, "Cancelled.");
        assert!(state.text(1, "Article 1").await.is_none());
    }

    #[tokio::test]
    async fn test_recent_links() {
        let (state, _) = make_state();
        assert!(state.recent_links().await.text.contains("empty"));

        state.begin_add_link(1).await;
        state.text(1, "First").await;
        state.text(1, "http://1").await;
        state.begin_add_link(1).await;
        state.text(1, "Second").await;
        state.text(1, "http://2").await;

        let text = state.recent_links().await.text;
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        assert!(second < first);
    }
}
