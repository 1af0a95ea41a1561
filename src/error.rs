//! Failures of a [`ChatBackend`](crate::client::ChatBackend) call.
//!
//! The widget never shows these to the user. Each component matches on
//! `Err(_)` once and renders its own fixed bubble (history, send or clear
//! error); the variant only ends up in the `tracing` event next to it.

use thiserror::Error;

/// Why a backend call failed.
#[derive(Error, Debug)]
pub enum Error {
    /// The server could not be reached or the connection dropped mid-request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `server.base_url` does not parse, so no endpoint URL can be built.
    /// Only raised when constructing an `HttpBackend`.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A 2xx body that is not the JSON shape of `/history` or `/chat`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx status from any endpoint. `ScriptedBackend` also reports its
    /// scripted failures as a 503 here.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },
}

/// Result of a backend call.
pub type Result<T> = std::result::Result<T, Error>;
