//! memo-chat
//!
//! A chat widget for a remembering chat server: it renders messages, restores
//! history on start, sends new messages optimistically and offers export and
//! clear actions. The widget is headless; the page it draws on is supplied
//! through the traits in [`surface`].
//!
//! # Architecture
//!
//! - **Widget**: renderer, sidebar, history loader, composer and actions
//! - **Client**: one trait call per server endpoint, `reqwest` implementation
//! - **Surfaces**: in-memory and terminal renderings of the page
//!
//! # Modules
//!
//! - [`widget`]: widget components and the assembled [`widget::ChatWidget`]
//! - [`client`]: backend trait and implementations
//! - [`surface`]: view traits and implementations
//! - [`config`]: layered configuration for the binary
//! - [`error`]: client error type

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod error;
pub mod surface;
pub mod widget;

pub use error::{Error, Result};
pub use widget::ChatWidget;
