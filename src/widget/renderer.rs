//! Message renderer: bubbles, display indices and scroll-back.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::trace;

use super::{Message, Role};
use crate::surface::ChatPane;

/// How long a scrolled-to bubble stays highlighted.
pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(1200);

/// Source of display indices.
///
/// Implementations must return strictly increasing values.
pub trait IndexSequence: fmt::Debug {
    fn next_index(&mut self) -> usize;
}

/// `0, 1, 2, …` (or from any starting point).
#[derive(Debug, Default, Clone)]
pub struct MonotonicSequence {
    next: usize,
}

impl MonotonicSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: usize) -> Self {
        Self { next: first }
    }
}

impl IndexSequence for MonotonicSequence {
    fn next_index(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        index
    }
}

#[derive(Debug)]
struct Bubble<N> {
    message: Message,
    node: N,
}

/// Appends bubbles to a [`ChatPane`] and remembers them by display index.
#[derive(Debug)]
pub struct MessageRenderer<P: ChatPane> {
    pane: P,
    sequence: Box<dyn IndexSequence + Send>,
    registry: HashMap<usize, Bubble<P::Node>>,
    order: Vec<usize>,
    highlights: HashMap<usize, Instant>,
    highlight_for: Duration,
}

impl<P: ChatPane> MessageRenderer<P> {
    /// Renderer numbering bubbles from 0.
    pub fn new(pane: P) -> Self {
        Self::with_sequence(pane, MonotonicSequence::new())
    }

    /// Renderer drawing indices from `sequence`.
    pub fn with_sequence(pane: P, sequence: impl IndexSequence + Send + 'static) -> Self {
        Self {
            pane,
            sequence: Box::new(sequence),
            registry: HashMap::new(),
            order: Vec::new(),
            highlights: HashMap::new(),
            highlight_for: DEFAULT_HIGHLIGHT,
        }
    }

    #[must_use]
    pub fn with_highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_for = duration;
        self
    }

    pub fn pane(&self) -> &P {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut P {
        &mut self.pane
    }

    /// Append a bubble stamped with the current time.
    pub fn append(&mut self, text: &str, role: Role) -> usize {
        self.append_at(text, role, Utc::now())
    }

    /// Append a bubble and scroll to the bottom. Returns its display index.
    pub fn append_at(&mut self, text: &str, role: Role, timestamp: DateTime<Utc>) -> usize {
        let display_index = self.sequence.next_index();
        let message = Message {
            role,
            text: text.to_owned(),
            timestamp,
            display_index,
        };
        let node = self.pane.append_bubble(&message);
        self.registry.insert(display_index, Bubble { message, node });
        self.order.push(display_index);
        self.pane.scroll_to_bottom();
        display_index
    }

    /// Rendered messages in display order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.order
            .iter()
            .filter_map(|index| self.registry.get(index))
            .map(|bubble| &bubble.message)
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.registry.get(&index).map(|bubble| &bubble.message)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Scroll to the bubble with `index` and highlight it for a moment.
    ///
    /// Returns `false` and does nothing when no such bubble is rendered.
    /// Repeating the call before the highlight expires moves the expiry.
    pub fn scroll_to_index(&mut self, index: usize) -> bool {
        let Some(bubble) = self.registry.get(&index) else {
            trace!(name: "chat.scroll.missing", index, "no bubble for index");
            return false;
        };
        self.pane.scroll_into_view(&bubble.node);
        self.pane.set_highlighted(&bubble.node, true);
        self.highlights
            .insert(index, Instant::now() + self.highlight_for);
        true
    }

    /// Earliest pending highlight expiry.
    pub fn next_highlight_deadline(&self) -> Option<Instant> {
        self.highlights.values().min().copied()
    }

    /// Drop highlights whose time is up. Returns how many were removed.
    pub fn expire_highlights(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<usize> = self
            .highlights
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(index, _)| *index)
            .collect();

        for index in &expired {
            self.highlights.remove(index);
            if let Some(bubble) = self.registry.get(index) {
                self.pane.set_highlighted(&bubble.node, false);
            }
        }
        expired.len()
    }

    /// Remove every bubble. The index sequence keeps counting.
    pub fn clear(&mut self) {
        self.pane.clear();
        self.registry.clear();
        self.order.clear();
        self.highlights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::memory::MemoryPane;

    #[test]
    fn test_indices_follow_call_order() {
        let mut renderer = MessageRenderer::new(MemoryPane::new());
        let roles = [Role::User, Role::Bot, Role::Bot, Role::User, Role::User];
        let indices: Vec<_> = roles
            .iter()
            .enumerate()
            .map(|(i, role)| renderer.append(&format!("msg {i}"), *role))
            .collect();

        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        let rendered: Vec<_> = renderer.pane().bubbles().iter().map(|b| b.index).collect();
        assert_eq!(rendered, indices);
        assert_eq!(renderer.pane().bottom_scrolls(), 5);
    }

    #[test]
    fn test_empty_text_renders_as_is() {
        let mut renderer = MessageRenderer::new(MemoryPane::new());
        renderer.append("   ", Role::User);
        assert_eq!(renderer.pane().bubbles()[0].text, "   ");
    }

    #[test]
    fn test_injected_sequence() {
        #[derive(Debug)]
        struct Evens(usize);
        impl IndexSequence for Evens {
            fn next_index(&mut self) -> usize {
                self.0 += 2;
                self.0
            }
        }

        let mut renderer = MessageRenderer::with_sequence(MemoryPane::new(), Evens(0));
        assert_eq!(renderer.append("a", Role::User), 2);
        assert_eq!(renderer.append("b", Role::Bot), 4);
        assert!(renderer.scroll_to_index(4));
        assert!(!renderer.scroll_to_index(3));
    }

    #[test]
    fn test_separate_renderers_do_not_share_indices() {
        let mut first = MessageRenderer::new(MemoryPane::new());
        let mut second = MessageRenderer::new(MemoryPane::new());
        first.append("a", Role::User);
        first.append("b", Role::User);
        assert_eq!(second.append("c", Role::User), 0);
    }

    #[tokio::test]
    async fn test_scroll_to_missing_index_is_noop() {
        let mut renderer = MessageRenderer::new(MemoryPane::new());
        renderer.append("hello", Role::User);

        assert!(!renderer.scroll_to_index(7));
        assert!(renderer.pane().scrolled_into_view().is_empty());
        assert!(renderer.pane().highlighted().is_empty());
        assert!(renderer.next_highlight_deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_expires() {
        let mut renderer = MessageRenderer::new(MemoryPane::new());
        renderer.append("one", Role::User);
        renderer.append("two", Role::Bot);

        assert!(renderer.scroll_to_index(0));
        assert_eq!(renderer.pane().scrolled_into_view(), &[0]);
        assert_eq!(renderer.pane().highlighted(), vec![0]);

        tokio::time::advance(Duration::from_millis(1199)).await;
        assert_eq!(renderer.expire_highlights(), 0);
        assert_eq!(renderer.pane().highlighted(), vec![0]);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(renderer.expire_highlights(), 1);
        assert!(renderer.pane().highlighted().is_empty());
        assert!(renderer.next_highlight_deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_scroll_moves_deadline() {
        let mut renderer = MessageRenderer::new(MemoryPane::new());
        renderer.append("one", Role::User);

        renderer.scroll_to_index(0);
        tokio::time::advance(Duration::from_millis(1000)).await;
        renderer.scroll_to_index(0);
        tokio::time::advance(Duration::from_millis(500)).await;

        assert_eq!(renderer.expire_highlights(), 0);
        assert_eq!(renderer.pane().highlighted(), vec![0]);

        tokio::time::advance(Duration::from_millis(700)).await;
        assert_eq!(renderer.expire_highlights(), 1);
    }

    #[test]
    fn test_clear_keeps_counting() {
        let mut renderer = MessageRenderer::new(MemoryPane::new());
        renderer.append("a", Role::User);
        renderer.append("b", Role::Bot);
        renderer.clear();

        assert!(renderer.is_empty());
        assert!(renderer.pane().bubbles().is_empty());
        assert!(!renderer.scroll_to_index(0));
        assert_eq!(renderer.append("c", Role::Bot), 2);
    }
}
