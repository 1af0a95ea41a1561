//! The chat widget.
//!
//! [`ChatWidget`] wires the components together and exposes the handlers a
//! frontend calls in response to page load, form submission and clicks:
//!
//! - [`renderer`]: bubbles and display indices
//! - [`format`]: preview and timestamp helpers
//! - [`sidebar`]: list of past user messages
//! - [`history`]: startup history load
//! - [`composer`]: optimistic send
//! - [`actions`]: export and clear
//!
//! Handlers take `&mut self`, so one runs at a time. Network failures are
//! turned into chat bubbles inside each handler and never returned.
//!
//! # Example
//!
//! ```rust
//! use memo_chat::client::{ChatReply, HistoryItem, ScriptedBackend};
//! use memo_chat::surface::memory::{MemoryList, MemoryPane, MemoryShell};
//! use memo_chat::widget::ChatWidget;
//!
//! # tokio_test_block_on(async {
//! let backend = ScriptedBackend::new()
//!     .with_history(vec![HistoryItem::new("user", "hi", None)])
//!     .with_reply(ChatReply::new("hello again"));
//! let mut widget = ChatWidget::new(MemoryPane::new(), MemoryList::new(), MemoryShell::default(), backend);
//!
//! widget.load_history().await;
//! widget.submit("how are you?").await;
//!
//! assert_eq!(widget.renderer().len(), 3);
//! assert_eq!(widget.sidebar().len(), 2);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod actions;
pub mod composer;
pub mod format;
pub mod history;
pub mod renderer;
pub mod sidebar;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

pub use actions::{ActionOutcome, Actions};
pub use composer::{Composer, ComposerState, SubmitOutcome};
pub use history::{HistoryLoader, LoadOutcome};
pub use renderer::{IndexSequence, MessageRenderer, MonotonicSequence};
pub use sidebar::{Sidebar, SidebarEntry};

use crate::client::ChatBackend;
use crate::config::WidgetSettings;
use crate::surface::{ChatPane, HistoryList, PageShell};

/// Who a bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// Map a server role: `"user"` is the user, everything else the bot.
    pub fn from_wire(role: &str) -> Self {
        if role == "user" { Role::User } else { Role::Bot }
    }
}

/// A rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Assigned by the renderer; the handle used to scroll back to the bubble.
    pub display_index: usize,
}

/// The assembled widget.
#[derive(Debug)]
pub struct ChatWidget<P: ChatPane, L, S, B> {
    renderer: MessageRenderer<P>,
    sidebar: Sidebar<L>,
    shell: S,
    backend: B,
    history: HistoryLoader,
    composer: Composer,
    actions: Actions,
}

impl<P, L, S, B> ChatWidget<P, L, S, B>
where
    P: ChatPane,
    L: HistoryList,
    S: PageShell,
    B: ChatBackend,
{
    /// Widget with default settings.
    pub fn new(pane: P, list: L, shell: S, backend: B) -> Self {
        Self::with_settings(pane, list, shell, backend, &WidgetSettings::default())
    }

    pub fn with_settings(pane: P, list: L, shell: S, backend: B, settings: &WidgetSettings) -> Self {
        let renderer = MessageRenderer::new(pane)
            .with_highlight_duration(Duration::from_millis(settings.highlight_ms));
        Self::from_parts(renderer, Sidebar::new(list), shell, backend, settings)
    }

    /// Widget around a prepared renderer and sidebar, e.g. with a custom
    /// [`IndexSequence`].
    pub fn from_parts(
        renderer: MessageRenderer<P>,
        sidebar: Sidebar<L>,
        shell: S,
        backend: B,
        settings: &WidgetSettings,
    ) -> Self {
        Self {
            renderer,
            sidebar: sidebar.with_preview_len(settings.preview_len),
            shell,
            backend,
            history: HistoryLoader::new(settings.history_limit),
            composer: Composer::new(),
            actions: Actions::new(settings.export_button, settings.clear_button),
        }
    }

    pub fn renderer(&self) -> &MessageRenderer<P> {
        &self.renderer
    }

    pub fn sidebar(&self) -> &Sidebar<L> {
        &self.sidebar
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn composer_state(&self) -> ComposerState {
        self.composer.state()
    }

    /// Page load: replay history into the chat and sidebar.
    pub async fn load_history(&mut self) -> LoadOutcome {
        self.history
            .load(&self.backend, &mut self.renderer, &mut self.sidebar)
            .await
    }

    /// Form submission.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        self.composer
            .submit(
                input,
                &self.backend,
                &mut self.renderer,
                &mut self.sidebar,
                &mut self.shell,
            )
            .await
    }

    /// Sidebar click on the entry at `position` (0 is the top row).
    pub fn activate_sidebar_entry(&mut self, position: usize) -> bool {
        self.sidebar
            .activate(position)
            .is_some_and(|index| self.renderer.scroll_to_index(index))
    }

    pub fn scroll_to_index(&mut self, index: usize) -> bool {
        self.renderer.scroll_to_index(index)
    }

    /// Export button.
    pub fn export(&mut self) -> ActionOutcome {
        self.actions.export(&self.backend, &mut self.shell)
    }

    /// Clear button.
    pub async fn clear(&mut self) -> ActionOutcome {
        self.actions
            .clear(
                &self.backend,
                &mut self.renderer,
                &mut self.sidebar,
                &mut self.shell,
            )
            .await
    }

    /// Remove highlights whose time is up.
    pub fn expire_highlights(&mut self) -> usize {
        self.renderer.expire_highlights()
    }

    pub fn next_highlight_deadline(&self) -> Option<Instant> {
        self.renderer.next_highlight_deadline()
    }
}
