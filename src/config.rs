//! Layered configuration for the `memo-chat` binary.
//!
//! Priority, lowest first: built-in defaults, config file, `CHAT_`-prefixed
//! environment variables (`CHAT_SERVER__BASE_URL=...`), command-line flags.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::widget::format::DEFAULT_PREVIEW_LEN;
use crate::widget::history::DEFAULT_HISTORY_LIMIT;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CHAT_CONFIG_FILE")]
    pub config: Option<String>,

    /// Chat server base URL
    #[arg(long, env = "CHAT_SERVER_URL")]
    pub server_url: Option<String>,

    /// How many messages to load on start
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Emit logs as JSON (`--log-json` alone means true)
    #[arg(
        long,
        env = "CHAT_LOG_JSON",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub widget: WidgetSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
}

/// Knobs of the widget itself.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Messages requested from `/history` on load.
    pub history_limit: usize,
    /// Sidebar preview length in characters.
    pub preview_len: usize,
    /// How long a scrolled-to bubble stays highlighted.
    pub highlight_ms: u64,
    /// Whether the export button is present.
    pub export_button: bool,
    /// Whether the clear button is present.
    pub clear_button: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            preview_len: DEFAULT_PREVIEW_LEN,
            highlight_ms: 1200,
            export_button: true,
            clear_button: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let defaults = WidgetSettings::default();
        let mut builder = Config::builder()
            .set_default("server.base_url", "http://127.0.0.1:5000")?
            .set_default("widget.history_limit", defaults.history_limit as u64)?
            .set_default("widget.preview_len", defaults.preview_len as u64)?
            .set_default("widget.highlight_ms", defaults.highlight_ms)?
            .set_default("widget.export_button", defaults.export_button)?
            .set_default("widget.clear_button", defaults.clear_button)?
            .set_default("logging.json", false)?;

        // An explicit file must exist; the working-directory one is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("memo-chat").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = cli.server_url {
            builder = builder.set_override("server.base_url", url)?;
        }
        if let Some(limit) = cli.history_limit {
            builder = builder.set_override("widget.history_limit", limit as u64)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        builder.build()?.try_deserialize()
    }
}
