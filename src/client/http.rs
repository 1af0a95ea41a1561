//! HTTP implementation of [`ChatBackend`].

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{ChatBackend, ChatReply, ChatRequest, HistoryItem, HistoryResponse};
use crate::error::{Error, Result};

/// `reqwest` client for the chat server.
///
/// The server identifies users with a `uid` cookie handed out on first
/// contact, so the underlying client keeps a cookie store the way a browser
/// would. Without it every request would look like a new user with an empty
/// history.
///
/// # Example
///
/// ```rust,no_run
/// use memo_chat::client::{ChatBackend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://127.0.0.1:5000")?;
/// let items = backend.history(100).await?;
/// println!("{} prior messages", items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client with a custom reqwest client.
    ///
    /// The caller is responsible for enabling the cookie store.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Relative joins below must keep any path prefix the server is mounted under.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn history(&self, limit: usize) -> Result<Vec<HistoryItem>> {
        let response = self
            .http
            .get(self.url("history"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        let body: HistoryResponse = Self::read_json(response).await?;
        let items = body.into_items();
        debug!(name: "backend.history", count = items.len(), limit, "history fetched");
        Ok(items)
    }

    async fn send(&self, message: &str) -> Result<ChatReply> {
        let req = ChatRequest {
            message: message.to_owned(),
        };
        let response = self
            .http
            .post(self.url("chat"))
            .json(&req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn clear(&self) -> Result<()> {
        let response = self.http.post(self.url("clear")).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    fn export_url(&self) -> Url {
        self.url("export")
    }
}
