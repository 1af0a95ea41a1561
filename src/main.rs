//! memo-chat terminal client
//!
//! Runs the chat widget against a chat server, one line per message.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use memo_chat::client::HttpBackend;
use memo_chat::config::AppConfig;
use memo_chat::surface::terminal::{InputLines, TerminalList, TerminalPane, TerminalShell};
use memo_chat::widget::{ActionOutcome, ChatWidget};

type TerminalWidget = ChatWidget<TerminalPane, TerminalList, TerminalShell, HttpBackend>;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(config.logging.json);

    info!(
        name: "chat.config.loaded",
        server = %config.server.base_url,
        history_limit = config.widget.history_limit,
        "configuration loaded"
    );

    let backend = HttpBackend::new(&config.server.base_url)
        .with_context(|| format!("invalid server URL {}", config.server.base_url))?;
    let input = InputLines::stdin();
    let mut widget: TerminalWidget = ChatWidget::with_settings(
        TerminalPane,
        TerminalList::default(),
        TerminalShell::new(input.clone()),
        backend,
        &config.widget,
    );

    print_help();
    widget.load_history().await;

    let mut show_prompt = true;
    loop {
        if show_prompt {
            widget.shell().prompt();
        }
        let deadline = widget.next_highlight_deadline();
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line else { break };
                if handle_line(&mut widget, &line).await == Flow::Quit {
                    break;
                }
                show_prompt = true;
            }
            () = highlight_expiry(deadline) => {
                widget.expire_highlights();
                show_prompt = false;
            }
        }
    }

    info!(name: "chat.exit", "bye");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    // Logs go to stderr so they never interleave with bubbles on stdout.
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

async fn highlight_expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn handle_line(widget: &mut TerminalWidget, line: &str) -> Flow {
    let command = line.trim();
    match command {
        "/quit" | "/exit" => return Flow::Quit,
        "/help" => print_help(),
        "/sidebar" => print_sidebar(widget),
        "/export" => {
            if widget.export() == ActionOutcome::Unavailable {
                println!("Export is disabled.");
            }
        }
        "/clear" => match widget.clear().await {
            ActionOutcome::Unavailable => println!("Clear is disabled."),
            ActionOutcome::Declined => println!("Nothing was cleared."),
            ActionOutcome::Done | ActionOutcome::Failed => {}
        },
        _ => {
            if let Some(arg) = command.strip_prefix("/goto") {
                goto(widget, arg.trim());
            } else {
                widget.submit(line).await;
            }
        }
    }
    Flow::Continue
}

fn goto(widget: &mut TerminalWidget, arg: &str) {
    let position = arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    let found = position.is_some_and(|position| widget.activate_sidebar_entry(position));
    if !found {
        println!("No sidebar entry {arg:?}. Use /sidebar to list them.");
    }
}

fn print_sidebar(widget: &TerminalWidget) {
    let entries = widget.sidebar().entries();
    if entries.is_empty() {
        println!("(sidebar is empty)");
        return;
    }
    for (n, entry) in entries.iter().enumerate() {
        if entry.time_label.is_empty() {
            println!("{:>3}. {}", n + 1, entry.preview);
        } else {
            println!("{:>3}. {}  ({})", n + 1, entry.preview, entry.time_label);
        }
    }
}

fn print_help() {
    println!("Type a message and press Enter. Commands:");
    println!("  /sidebar   list your past messages");
    println!("  /goto N    jump to sidebar entry N");
    println!("  /export    show the history download link");
    println!("  /clear     delete your history");
    println!("  /quit      exit");
}
