//! View surfaces the widget renders into.
//!
//! The widget core never touches a concrete UI. It drives three traits:
//!
//! - [`ChatPane`]: the scrollable message container
//! - [`HistoryList`]: the sidebar list of past user messages
//! - [`PageShell`]: the input field plus page-level affordances
//!   (confirmation prompt, navigation)
//!
//! Two implementations ship with the crate: [`memory`] keeps everything in
//! plain vectors for tests and embedders, [`terminal`] prints to stdout for
//! the `memo-chat` binary.

pub mod memory;
pub mod terminal;

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::widget::{Message, SidebarEntry};

/// The scrollable chat pane.
pub trait ChatPane {
    /// Handle to a rendered bubble, kept in the renderer's registry.
    type Node: Clone + fmt::Debug;

    /// Render one bubble at the end of the pane.
    fn append_bubble(&mut self, message: &Message) -> Self::Node;

    /// Scroll the pane to its last bubble.
    fn scroll_to_bottom(&mut self);

    /// Bring a bubble into view.
    fn scroll_into_view(&mut self, node: &Self::Node);

    /// Toggle the transient highlight on a bubble.
    fn set_highlighted(&mut self, node: &Self::Node, highlighted: bool);

    /// Remove every bubble.
    fn clear(&mut self);
}

/// The sidebar list.
pub trait HistoryList {
    /// Replace the whole list, top to bottom.
    fn replace_entries(&mut self, entries: &[SidebarEntry]);

    /// Insert one entry above all others.
    fn insert_first(&mut self, entry: &SidebarEntry);

    /// Remove every entry.
    fn clear(&mut self);
}

/// Input field and page-level affordances.
#[async_trait]
pub trait PageShell: Send {
    /// Empty the message input.
    fn clear_input(&mut self);

    /// Put focus back on the message input.
    fn focus_input(&mut self);

    /// Ask a yes/no question. Only `true` means proceed.
    async fn confirm(&mut self, prompt: &str) -> bool;

    /// Navigate the page to `url` (used for downloads).
    fn navigate(&mut self, url: &Url);
}
