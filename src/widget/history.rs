//! Startup history load.

use chrono::Utc;
use tracing::{info, warn};

use super::format::parse_timestamp;
use super::renderer::MessageRenderer;
use super::sidebar::Sidebar;
use super::Role;
use crate::client::{ChatBackend, HistoryItem};
use crate::surface::{ChatPane, HistoryList};

/// How many messages to ask for by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Shown instead of history when the server has none.
pub const ONBOARDING_MESSAGE: &str = "Hi! I can remember things for you. \
Try “remember my birthday is Nov 9”, then ask “when is my birthday?”. \
Anything else is answered as regular chat.";

/// Shown when history could not be fetched.
pub const HISTORY_ERROR: &str = "Could not load history. Try again.";

/// What a load rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No history; the onboarding message was shown.
    Onboarded,
    /// History was replayed.
    Restored { messages: usize, user_messages: usize },
    /// The request failed; the error message was shown.
    Failed,
}

/// Fetches prior conversation and replays it into the renderer and sidebar.
#[derive(Debug, Clone)]
pub struct HistoryLoader {
    limit: usize,
}

impl Default for HistoryLoader {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryLoader {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Issue one history request and render the result.
    ///
    /// Failures end up as a chat bubble, never as an error for the caller.
    pub async fn load<B, P, L>(
        &self,
        backend: &B,
        renderer: &mut MessageRenderer<P>,
        sidebar: &mut Sidebar<L>,
    ) -> LoadOutcome
    where
        B: ChatBackend + ?Sized,
        P: ChatPane,
        L: HistoryList,
    {
        let items = match backend.history(self.limit).await {
            Ok(items) => items,
            Err(e) => {
                warn!(name: "chat.history.failed", error = %e, "history request failed");
                renderer.append(HISTORY_ERROR, Role::Bot);
                return LoadOutcome::Failed;
            }
        };

        if items.is_empty() {
            renderer.append(ONBOARDING_MESSAGE, Role::Bot);
            info!(name: "chat.history.empty", "no history, showing onboarding");
            return LoadOutcome::Onboarded;
        }

        let mut user_items: Vec<HistoryItem> = Vec::new();
        let mut user_indices = Vec::new();
        for item in &items {
            let role = Role::from_wire(&item.role);
            let timestamp = item
                .ts
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now);
            let index = renderer.append_at(item.text(), role, timestamp);
            if role == Role::User {
                user_items.push(item.clone());
                user_indices.push(index);
            }
        }
        sidebar.render(&user_items, &user_indices);

        info!(
            name: "chat.history.loaded",
            messages = items.len(),
            user_messages = user_items.len(),
            "history restored"
        );
        LoadOutcome::Restored {
            messages: items.len(),
            user_messages: user_items.len(),
        }
    }
}
