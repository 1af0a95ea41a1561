//! Export and clear buttons.

use tracing::{info, warn};

use super::Role;
use super::renderer::MessageRenderer;
use super::sidebar::Sidebar;
use crate::client::ChatBackend;
use crate::surface::{ChatPane, HistoryList, PageShell};

/// Confirmation asked before clearing.
pub const CLEAR_PROMPT: &str = "Clear all chat history? This cannot be undone.";

/// Shown after a successful clear.
pub const CLEARED_MESSAGE: &str = "History cleared.";

/// Shown when the clear request fails.
pub const CLEAR_ERROR: &str = "Could not clear history. Please try again.";

/// Result of an export or clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The control is not present on this page.
    Unavailable,
    /// The user said no at the confirmation prompt.
    Declined,
    /// The action went through.
    Done,
    /// The request failed; local state was left alone.
    Failed,
}

/// Which optional controls are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actions {
    export_enabled: bool,
    clear_enabled: bool,
}

impl Default for Actions {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Actions {
    pub fn new(export_enabled: bool, clear_enabled: bool) -> Self {
        Self {
            export_enabled,
            clear_enabled,
        }
    }

    /// Send the page to the download endpoint.
    pub fn export<B, S>(&self, backend: &B, shell: &mut S) -> ActionOutcome
    where
        B: ChatBackend + ?Sized,
        S: PageShell + ?Sized,
    {
        if !self.export_enabled {
            return ActionOutcome::Unavailable;
        }
        let url = backend.export_url();
        info!(name: "chat.export", url = %url, "export requested");
        shell.navigate(&url);
        ActionOutcome::Done
    }

    /// Clear server history after confirmation, then the local view.
    ///
    /// The local view is only wiped once the server has acknowledged. On
    /// failure the chat keeps its bubbles and gains an error bubble.
    pub async fn clear<B, P, L, S>(
        &self,
        backend: &B,
        renderer: &mut MessageRenderer<P>,
        sidebar: &mut Sidebar<L>,
        shell: &mut S,
    ) -> ActionOutcome
    where
        B: ChatBackend + ?Sized,
        P: ChatPane,
        L: HistoryList,
        S: PageShell + ?Sized,
    {
        if !self.clear_enabled {
            return ActionOutcome::Unavailable;
        }
        if !shell.confirm(CLEAR_PROMPT).await {
            return ActionOutcome::Declined;
        }

        match backend.clear().await {
            Ok(()) => {
                renderer.clear();
                sidebar.clear();
                renderer.append(CLEARED_MESSAGE, Role::Bot);
                info!(name: "chat.history.cleared", "history cleared");
                ActionOutcome::Done
            }
            Err(e) => {
                warn!(name: "chat.clear.failed", error = %e, "clear request failed");
                renderer.append(CLEAR_ERROR, Role::Bot);
                ActionOutcome::Failed
            }
        }
    }
}
