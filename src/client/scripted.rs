//! Offline backend with canned answers.
//!
//! Useful for tests and for hosting the widget without a server. Every call is
//! recorded so callers can assert on what was (or was not) requested.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use url::Url;

use super::{ChatBackend, ChatReply, HistoryItem};
use crate::error::{Error, Result};

/// A request seen by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    History { limit: usize },
    Send { message: String },
    Clear,
}

#[derive(Debug, Default)]
struct Script {
    history: Option<Vec<HistoryItem>>,
    replies: VecDeque<Option<ChatReply>>,
    clear_ok: bool,
    calls: Vec<BackendCall>,
}

/// Backend answering from a script.
///
/// History and clear fail until configured; each `send` consumes the next
/// scripted reply and fails once the script runs out.
#[derive(Debug)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
    export_url: Url,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable() -> Error {
    Error::Api {
        status: 503,
        message: "scripted failure".into(),
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script::default()),
            export_url: Url::parse("http://localhost/export").expect("static URL is valid"),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `items` from `history`.
    #[must_use]
    pub fn with_history(self, items: Vec<HistoryItem>) -> Self {
        self.script().history = Some(items);
        self
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn with_reply(self, reply: ChatReply) -> Self {
        self.script().replies.push_back(Some(reply));
        self
    }

    /// Queue a failing send.
    #[must_use]
    pub fn with_send_failure(self) -> Self {
        self.script().replies.push_back(None);
        self
    }

    /// Make `clear` succeed.
    #[must_use]
    pub fn with_clear_ok(self) -> Self {
        self.script().clear_ok = true;
        self
    }

    /// Every request made so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.script().calls.clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn history(&self, limit: usize) -> Result<Vec<HistoryItem>> {
        let mut script = self.script();
        script.calls.push(BackendCall::History { limit });
        script
            .history
            .as_ref()
            .map(|items| items[items.len().saturating_sub(limit)..].to_vec())
            .ok_or_else(unavailable)
    }

    async fn send(&self, message: &str) -> Result<ChatReply> {
        let mut script = self.script();
        script.calls.push(BackendCall::Send {
            message: message.to_owned(),
        });
        script.replies.pop_front().flatten().ok_or_else(unavailable)
    }

    async fn clear(&self) -> Result<()> {
        let mut script = self.script();
        script.calls.push(BackendCall::Clear);
        if script.clear_ok {
            script.history = Some(Vec::new());
            Ok(())
        } else {
            Err(unavailable())
        }
    }

    fn export_url(&self) -> Url {
        self.export_url.clone()
    }
}
