//! Line-oriented terminal surface used by the `memo-chat` binary.
//!
//! Bubbles are printed to stdout as they are appended; the terminal's own
//! scrollback stands in for the scrollable pane. Logs go to stderr.

use std::io::{self, Write};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::{ChatPane, HistoryList, PageShell};
use crate::widget::{Message, Role, SidebarEntry};

/// Shared handle on stdin lines.
///
/// The event loop reads commands from it and the shell reads confirmation
/// answers from it; only one of them waits at a time.
#[derive(Debug, Clone)]
pub struct InputLines {
    inner: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl InputLines {
    pub fn stdin() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// Next line, or `None` on end of input or a read error.
    pub async fn next_line(&self) -> Option<String> {
        let mut lines = self.inner.lock().await;
        match lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(name: "terminal.stdin.failed", error = %e, "stdin read failed");
                None
            }
        }
    }
}

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Bot => "bot",
    }
}

/// Prints bubbles as `[#index] role: text`.
#[derive(Debug, Default)]
pub struct TerminalPane;

impl ChatPane for TerminalPane {
    /// The rendered line, reprinted when scrolled back to.
    type Node = String;

    fn append_bubble(&mut self, message: &Message) -> String {
        let line = format!(
            "[#{}] {}: {}",
            message.display_index,
            label(message.role),
            message.text
        );
        println!("{line}");
        line
    }

    fn scroll_to_bottom(&mut self) {
        let _ = io::stdout().flush();
    }

    fn scroll_into_view(&mut self, node: &String) {
        println!("  {node}");
    }

    fn set_highlighted(&mut self, node: &String, highlighted: bool) {
        if highlighted {
            println!("» {node}");
        } else {
            debug!(name: "terminal.highlight.cleared", bubble = %node, "highlight removed");
        }
    }

    fn clear(&mut self) {
        println!("{}", "-".repeat(40));
    }
}

/// Sidebar list; the binary prints entries on demand with `/sidebar`.
#[derive(Debug, Default)]
pub struct TerminalList {
    len: usize,
}

impl HistoryList for TerminalList {
    fn replace_entries(&mut self, entries: &[SidebarEntry]) {
        self.len = entries.len();
        debug!(name: "terminal.sidebar.rendered", entries = self.len, "sidebar rebuilt");
    }

    fn insert_first(&mut self, entry: &SidebarEntry) {
        self.len += 1;
        debug!(name: "terminal.sidebar.prepended", index = entry.index, entries = self.len, "sidebar entry added");
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Input prompt and confirmation over stdin/stdout.
#[derive(Debug)]
pub struct TerminalShell {
    input: InputLines,
}

impl TerminalShell {
    pub fn new(input: InputLines) -> Self {
        Self { input }
    }

    /// Print the input prompt.
    pub fn prompt(&self) {
        print!("> ");
        let _ = io::stdout().flush();
    }
}

#[async_trait]
impl PageShell for TerminalShell {
    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    async fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        self.input
            .next_line()
            .await
            .is_some_and(|answer| is_yes(&answer))
    }

    fn navigate(&mut self, url: &Url) {
        println!("Download your history at {url}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
