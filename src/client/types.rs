//! Wire types for the chat server endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// History
// =============================================================================

/// One prior conversation message as returned by `GET /history`.
///
/// Fields are read leniently: a number or other non-string value is kept as
/// its JSON text instead of rejecting the whole history body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Sender role. `"user"` for the user, anything else is the bot.
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: String,
    /// Message text; the server may omit it or send null.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub message: Option<String>,
    /// ISO-8601 timestamp; may be absent or null.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub ts: Option<String>,
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn deserialize_role<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_text(deserializer).map(Option::unwrap_or_default)
}

impl HistoryItem {
    /// Convenience constructor used by tests and stub servers.
    pub fn new(role: impl Into<String>, message: impl Into<String>, ts: Option<&str>) -> Self {
        Self {
            role: role.into(),
            message: Some(message.into()),
            ts: ts.map(str::to_owned),
        }
    }

    /// Message text, empty when absent.
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Whether this item was sent by the user.
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// Body of `GET /history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Missing or null means no history.
    #[serde(default)]
    pub items: Option<Vec<HistoryItem>>,
}

impl HistoryResponse {
    pub fn into_items(self) -> Vec<HistoryItem> {
        self.items.unwrap_or_default()
    }
}

// =============================================================================
// Chat
// =============================================================================

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

/// Reply from `POST /chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    /// Bot reply; may be absent, null or empty.
    #[serde(default)]
    pub reply: Option<String>,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }

    /// The reply text, or `None` when there is nothing to show.
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|r| !r.is_empty())
    }
}
