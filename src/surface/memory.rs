//! In-memory surface.
//!
//! Records everything the widget asks of it so tests (and hosts that render
//! the state themselves) can inspect the result.

use async_trait::async_trait;
use url::Url;

use super::{ChatPane, HistoryList, PageShell};
use crate::widget::{Message, Role, SidebarEntry};

/// A bubble as held by [`MemoryPane`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBubble {
    pub role: Role,
    pub text: String,
    pub index: usize,
    pub highlighted: bool,
}

/// Chat pane backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryPane {
    bubbles: Vec<RenderedBubble>,
    bottom_scrolls: usize,
    scrolled_into_view: Vec<usize>,
}

impl MemoryPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bubbles in display order.
    pub fn bubbles(&self) -> &[RenderedBubble] {
        &self.bubbles
    }

    /// How many times the pane was scrolled to the bottom.
    pub fn bottom_scrolls(&self) -> usize {
        self.bottom_scrolls
    }

    /// Display indices brought into view, in call order.
    pub fn scrolled_into_view(&self) -> &[usize] {
        &self.scrolled_into_view
    }

    /// Display indices of currently highlighted bubbles.
    pub fn highlighted(&self) -> Vec<usize> {
        self.bubbles
            .iter()
            .filter(|b| b.highlighted)
            .map(|b| b.index)
            .collect()
    }
}

impl ChatPane for MemoryPane {
    /// Position in [`MemoryPane::bubbles`].
    type Node = usize;

    fn append_bubble(&mut self, message: &Message) -> usize {
        self.bubbles.push(RenderedBubble {
            role: message.role,
            text: message.text.clone(),
            index: message.display_index,
            highlighted: false,
        });
        self.bubbles.len() - 1
    }

    fn scroll_to_bottom(&mut self) {
        self.bottom_scrolls += 1;
    }

    fn scroll_into_view(&mut self, node: &usize) {
        if let Some(bubble) = self.bubbles.get(*node) {
            self.scrolled_into_view.push(bubble.index);
        }
    }

    fn set_highlighted(&mut self, node: &usize, highlighted: bool) {
        if let Some(bubble) = self.bubbles.get_mut(*node) {
            bubble.highlighted = highlighted;
        }
    }

    fn clear(&mut self) {
        self.bubbles.clear();
    }
}

/// Sidebar list backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryList {
    entries: Vec<SidebarEntry>,
}

impl MemoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries top to bottom.
    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }
}

impl HistoryList for MemoryList {
    fn replace_entries(&mut self, entries: &[SidebarEntry]) {
        self.entries = entries.to_vec();
    }

    fn insert_first(&mut self, entry: &SidebarEntry) {
        self.entries.insert(0, entry.clone());
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Page shell with a scripted confirmation answer.
#[derive(Debug)]
pub struct MemoryShell {
    confirm_answer: bool,
    prompts: Vec<String>,
    navigations: Vec<Url>,
    input_clears: usize,
    focused: bool,
}

impl Default for MemoryShell {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MemoryShell {
    /// Shell that answers every confirmation with `confirm_answer`.
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            confirm_answer,
            prompts: Vec::new(),
            navigations: Vec::new(),
            input_clears: 0,
            focused: false,
        }
    }

    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    /// Confirmation prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// URLs navigated to so far.
    pub fn navigations(&self) -> &[Url] {
        &self.navigations
    }

    pub fn input_clears(&self) -> usize {
        self.input_clears
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

#[async_trait]
impl PageShell for MemoryShell {
    fn clear_input(&mut self) {
        self.input_clears += 1;
    }

    fn focus_input(&mut self) {
        self.focused = true;
    }

    async fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_owned());
        self.confirm_answer
    }

    fn navigate(&mut self, url: &Url) {
        self.navigations.push(url.clone());
    }
}
