//! Per-user dialogue tracking.
//!
//! A dialogue is a short exchange where the next free-text messages from a
//! user are answers to a question the bot asked, rather than new requests.
//! Two dialogues exist:
//!
//! ```text
//! Idle ──begin(Name)────────► AwaitingName ──advance──► Idle   (NameReady)
//! Idle ──begin(LibraryLink)─► AwaitingLibraryLink{Title}
//!                               ──advance──► AwaitingLibraryLink{Url}   (Continuing)
//!                               ──advance──► Idle                       (LibraryItemReady)
//! ```
//!
//! Starting a dialogue replaces whatever dialogue the user was in. Entries
//! that see no activity for the configured idle timeout are treated as
//! `Idle` and dropped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ark_models::{NewLibraryItem, UserId};
use tokio::sync::RwLock;
use tracing::debug;

/// Which dialogue to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueKind {
    /// One step: the next message becomes the user's name.
    Name,
    /// Two steps: title, then URL.
    LibraryLink,
}

/// Step within the library-link dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStep {
    Title,
    Url,
}

/// Where a user currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogueState {
    /// No active dialogue.
    #[default]
    Idle,
    AwaitingName,
    AwaitingLibraryLink {
        step: LinkStep,
        title: Option<String>,
    },
}

impl DialogueState {
    fn initial(kind: DialogueKind) -> Self {
        match kind {
            DialogueKind::Name => DialogueState::AwaitingName,
            DialogueKind::LibraryLink => DialogueState::AwaitingLibraryLink {
                step: LinkStep::Title,
                title: None,
            },
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DialogueState::Idle)
    }
}

/// Result of feeding one message to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user has no active dialogue; the message is not a step input.
    Ignored,
    /// The step was recorded and the dialogue waits for the next message.
    Continuing,
    /// The name dialogue finished with this name.
    NameReady(String),
    /// The library-link dialogue finished with this item.
    LibraryItemReady(NewLibraryItem),
}

#[derive(Debug)]
struct Entry {
    state: DialogueState,
    touched: Instant,
}

impl Entry {
    fn new(state: DialogueState) -> Self {
        Self {
            state,
            touched: Instant::now(),
        }
    }
}

/// Authoritative map from user id to dialogue state.
///
/// Each operation runs under a single write guard, so two messages from the
/// same user are applied one after the other.
#[derive(Debug)]
pub struct DialogueTracker {
    entries: RwLock<HashMap<UserId, Entry>>,
    idle_timeout: Option<Duration>,
}

impl DialogueTracker {
    /// Creates a tracker. `idle_timeout` of `None` keeps dialogues forever.
    pub fn new(idle_timeout: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| entry.touched.elapsed() >= timeout)
    }

    /// Starts a dialogue, replacing any dialogue already in progress.
    pub async fn begin(&self, user: UserId, kind: DialogueKind) {
        let mut entries = self.entries.write().await;
        let previous = entries.insert(user, Entry::new(DialogueState::initial(kind)));
        debug!(
            user_id = user,
            kind = ?kind,
            replaced = ?previous.map(|e| e.state),
            "Dialogue started"
        );
    }

    /// Feeds one free-text message to the user's dialogue.
    pub async fn advance(&self, user: UserId, text: &str) -> Outcome {
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get_mut(&user) else {
            return Outcome::Ignored;
        };
        if self.is_expired(entry) {
            entries.remove(&user);
            debug!(user_id = user, "Dialogue expired");
            return Outcome::Ignored;
        }

        match &mut entry.state {
            DialogueState::Idle => Outcome::Ignored,
            DialogueState::AwaitingName => {
                entries.remove(&user);
                Outcome::NameReady(text.to_string())
            }
            DialogueState::AwaitingLibraryLink {
                step: step @ LinkStep::Title,
                title,
            } => {
                *title = Some(text.to_string());
                *step = LinkStep::Url;
                entry.touched = Instant::now();
                Outcome::Continuing
            }
            DialogueState::AwaitingLibraryLink {
                step: LinkStep::Url,
                title,
            } => {
                let title = title.take().unwrap_or_default();
                entries.remove(&user);
                Outcome::LibraryItemReady(NewLibraryItem::new(title, text))
            }
        }
    }

    /// Drops the user's dialogue. Returns whether one was active.
    pub async fn cancel(&self, user: UserId) -> bool {
        let removed = self.entries.write().await.remove(&user);
        match removed {
            Some(entry) if !self.is_expired(&entry) => {
                debug!(user_id = user, state = ?entry.state, "Dialogue cancelled");
                true
            }
            _ => false,
        }
    }

    /// Current state of the user's dialogue.
    pub async fn state(&self, user: UserId) -> DialogueState {
        let entries = self.entries.read().await;
        match entries.get(&user) {
            Some(entry) if !self.is_expired(entry) => entry.state.clone(),
            _ => DialogueState::Idle,
        }
    }

    /// Removes expired dialogues and returns how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        if self.idle_timeout.is_none() {
            return 0;
        }
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        before - entries.len()
    }

    /// Number of users with a stored dialogue, expired or not.
    pub async fn active_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for DialogueTracker {
    fn default() -> Self {
        Self::new(None)
    }
}
