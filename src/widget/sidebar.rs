//! Sidebar of past user messages.
//!
//! A full [`Sidebar::render`] lists history oldest-first, while
//! [`Sidebar::prepend`] puts live sends on top. A session that loads history
//! and then sends therefore shows new messages newest-first above old ones
//! oldest-first. That mixed order is kept as is.

use chrono::{DateTime, Utc};

use super::format::{DEFAULT_PREVIEW_LEN, format_instant, format_time, summarize};
use crate::client::HistoryItem;
use crate::surface::HistoryList;

/// One clickable sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Summarized message text.
    pub preview: String,
    /// Formatted timestamp; empty when unknown.
    pub time_label: String,
    /// Display index of the chat bubble this entry points at.
    pub index: usize,
}

/// Sidebar model plus the list view it keeps in sync.
#[derive(Debug)]
pub struct Sidebar<L> {
    list: L,
    entries: Vec<SidebarEntry>,
    preview_len: usize,
}

impl<L: HistoryList> Sidebar<L> {
    pub fn new(list: L) -> Self {
        Self {
            list,
            entries: Vec::new(),
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }

    #[must_use]
    pub fn with_preview_len(mut self, preview_len: usize) -> Self {
        self.preview_len = preview_len;
        self
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    /// Entries top to bottom.
    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    /// Rebuild the list from user history items and their bubble indices.
    ///
    /// `items[i]` is paired with `indices[i]`; unpaired trailing elements of the
    /// longer slice are ignored.
    pub fn render(&mut self, items: &[HistoryItem], indices: &[usize]) {
        self.entries = items
            .iter()
            .zip(indices)
            .map(|(item, &index)| SidebarEntry {
                preview: summarize(item.message.as_deref(), self.preview_len),
                time_label: item.ts.as_deref().map(format_time).unwrap_or_default(),
                index,
            })
            .collect();
        self.list.replace_entries(&self.entries);
    }

    /// Put a freshly sent message on top.
    pub fn prepend(&mut self, text: &str, ts: DateTime<Utc>, index: usize) {
        let entry = SidebarEntry {
            preview: summarize(Some(text), self.preview_len),
            time_label: format_instant(ts),
            index,
        };
        self.list.insert_first(&entry);
        self.entries.insert(0, entry);
    }

    /// The bubble index behind the entry at `position` (0 is the top row).
    pub fn activate(&self, position: usize) -> Option<usize> {
        self.entries.get(position).map(|entry| entry.index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::memory::MemoryList;

    fn user(text: &str) -> HistoryItem {
        HistoryItem::new("user", text, Some("2024-11-09T10:00:00Z"))
    }

    #[test]
    fn test_render_empty() {
        let mut sidebar = Sidebar::new(MemoryList::new());
        sidebar.render(&[], &[]);
        assert!(sidebar.is_empty());
        assert!(sidebar.list().entries().is_empty());
    }

    #[test]
    fn test_render_keeps_input_order() {
        let mut sidebar = Sidebar::new(MemoryList::new());
        let items = [user("first"), user("second"), user("third")];
        sidebar.render(&items, &[0, 2, 5]);

        let previews: Vec<_> = sidebar.entries().iter().map(|e| e.preview.as_str()).collect();
        assert_eq!(previews, vec!["first", "second", "third"]);
        assert_eq!(sidebar.list().entries(), sidebar.entries());
        assert_eq!(sidebar.activate(1), Some(2));
        assert_eq!(sidebar.activate(3), None);
        assert!(!sidebar.entries()[0].time_label.is_empty());
    }

    #[test]
    fn test_render_replaces_previous_entries() {
        let mut sidebar = Sidebar::new(MemoryList::new());
        sidebar.render(&[user("old")], &[0]);
        sidebar.render(&[user("new")], &[4]);
        assert_eq!(sidebar.len(), 1);
        assert_eq!(sidebar.entries()[0].index, 4);
    }

    #[test]
    fn test_render_missing_fields() {
        let mut sidebar = Sidebar::new(MemoryList::new());
        let item = HistoryItem {
            role: "user".into(),
            message: None,
            ts: Some("garbage".into()),
        };
        sidebar.render(&[item], &[0]);
        assert_eq!(sidebar.entries()[0].preview, "(empty)");
        assert_eq!(sidebar.entries()[0].time_label, "");
    }

    #[test]
    fn test_prepend_goes_on_top() {
        let mut sidebar = Sidebar::new(MemoryList::new()).with_preview_len(10);
        sidebar.render(&[user("a"), user("b")], &[0, 1]);
        sidebar.prepend("a rather long live message", Utc::now(), 2);
        sidebar.prepend("newest", Utc::now(), 3);

        let order: Vec<_> = sidebar.entries().iter().map(|e| e.index).collect();
        assert_eq!(order, vec![3, 2, 0, 1]);
        assert_eq!(sidebar.entries()[1].preview, "a rather …");
        assert_eq!(sidebar.list().entries(), sidebar.entries());
    }
}
