//! Chat server client.
//!
//! The widget never talks HTTP directly. It goes through [`ChatBackend`],
//! which mirrors the four server endpoints one call each:
//!
//! - `GET /history?limit=N` → [`ChatBackend::history`]
//! - `POST /chat` → [`ChatBackend::send`]
//! - `POST /clear` → [`ChatBackend::clear`]
//! - `GET /export` → [`ChatBackend::export_url`] (navigated to, never fetched)
//!
//! [`HttpBackend`] is the `reqwest` implementation used by the binary;
//! [`ScriptedBackend`] answers from canned data without a server.

mod http;
mod scripted;
mod types;

pub use http::HttpBackend;
pub use scripted::{BackendCall, ScriptedBackend};
pub use types::{ChatReply, ChatRequest, HistoryItem, HistoryResponse};

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

/// The server side of the widget.
///
/// Every call is one round trip. Implementations must not retry; failures are
/// returned to the component that issued the call.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetch up to `limit` prior messages, oldest first.
    async fn history(&self, limit: usize) -> Result<Vec<HistoryItem>>;

    /// Post a user message and return the bot's reply.
    async fn send(&self, message: &str) -> Result<ChatReply>;

    /// Ask the server to forget this user's history.
    async fn clear(&self) -> Result<()>;

    /// Where the browser should navigate to download the history.
    fn export_url(&self) -> Url;
}
