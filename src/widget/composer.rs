//! Message composer: optimistic send and reply rendering.

use chrono::Utc;
use tracing::{debug, warn};

use super::Role;
use super::renderer::MessageRenderer;
use super::sidebar::Sidebar;
use crate::client::ChatBackend;
use crate::surface::{ChatPane, HistoryList, PageShell};

/// Rendered when the server reply is missing or empty.
pub const REPLY_PLACEHOLDER: &str = "…";

/// Rendered when the send fails.
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// Where the composer is in a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerState {
    #[default]
    Idle,
    Sending,
}

/// Result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The server answered; `reply_index` is the bot bubble.
    Replied { user_index: usize, reply_index: usize },
    /// The send failed; `error_index` is the error bubble.
    Failed { user_index: usize, error_index: usize },
}

/// Captures user input and talks to the server.
#[derive(Debug, Default)]
pub struct Composer {
    state: ComposerState,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Submit `input`.
    ///
    /// The user bubble, the cleared input and the sidebar entry appear before
    /// the request is made and stay whatever the outcome.
    pub async fn submit<B, P, L, S>(
        &mut self,
        input: &str,
        backend: &B,
        renderer: &mut MessageRenderer<P>,
        sidebar: &mut Sidebar<L>,
        shell: &mut S,
    ) -> SubmitOutcome
    where
        B: ChatBackend + ?Sized,
        P: ChatPane,
        L: HistoryList,
        S: PageShell + ?Sized,
    {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.state = ComposerState::Sending;
        let sent_at = Utc::now();
        let user_index = renderer.append_at(text, Role::User, sent_at);
        shell.clear_input();
        shell.focus_input();
        sidebar.prepend(text, sent_at, user_index);

        let outcome = match backend.send(text).await {
            Ok(reply) => {
                let reply_index =
                    renderer.append(reply.text().unwrap_or(REPLY_PLACEHOLDER), Role::Bot);
                debug!(name: "chat.send.replied", user_index, reply_index, "reply rendered");
                SubmitOutcome::Replied {
                    user_index,
                    reply_index,
                }
            }
            Err(e) => {
                warn!(name: "chat.send.failed", error = %e, user_index, "send failed");
                let error_index = renderer.append(NETWORK_ERROR, Role::Bot);
                SubmitOutcome::Failed {
                    user_index,
                    error_index,
                }
            }
        };
        self.state = ComposerState::Idle;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BackendCall, ChatReply, ScriptedBackend};
    use crate::surface::memory::{MemoryList, MemoryPane, MemoryShell};

    struct Parts {
        renderer: MessageRenderer<MemoryPane>,
        sidebar: Sidebar<MemoryList>,
        shell: MemoryShell,
    }

    fn parts() -> Parts {
        Parts {
            renderer: MessageRenderer::new(MemoryPane::new()),
            sidebar: Sidebar::new(MemoryList::new()),
            shell: MemoryShell::default(),
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let backend = ScriptedBackend::new().with_reply(ChatReply::new("unused"));
        let mut p = parts();
        let mut composer = Composer::new();

        for input in ["", "   ", "\n\t"] {
            let outcome = composer
                .submit(input, &backend, &mut p.renderer, &mut p.sidebar, &mut p.shell)
                .await;
            assert_eq!(outcome, SubmitOutcome::Ignored);
        }

        assert!(backend.calls().is_empty());
        assert!(p.renderer.is_empty());
        assert!(p.sidebar.is_empty());
        assert_eq!(p.shell.input_clears(), 0);
        assert_eq!(composer.state(), ComposerState::Idle);
    }

    #[tokio::test]
    async fn test_reply_rendered_after_user_bubble() {
        let backend = ScriptedBackend::new().with_reply(ChatReply::new("Got it!"));
        let mut p = parts();
        let mut composer = Composer::new();

        let outcome = composer
            .submit(
                "  remember my birthday is Nov 9 ",
                &backend,
                &mut p.renderer,
                &mut p.sidebar,
                &mut p.shell,
            )
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Replied {
                user_index: 0,
                reply_index: 1
            }
        );
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Send {
                message: "remember my birthday is Nov 9".into()
            }]
        );
        let texts: Vec<_> = p.renderer.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["remember my birthday is Nov 9", "Got it!"]);
        assert_eq!(p.sidebar.entries()[0].index, 0);
        assert_eq!(p.shell.input_clears(), 1);
        assert!(p.shell.is_focused());
        assert_eq!(composer.state(), ComposerState::Idle);
    }

    #[tokio::test]
    async fn test_missing_reply_uses_placeholder() {
        let backend = ScriptedBackend::new()
            .with_reply(ChatReply::default())
            .with_reply(ChatReply::new(""));
        let mut p = parts();
        let mut composer = Composer::new();

        for input in ["one", "two"] {
            composer
                .submit(input, &backend, &mut p.renderer, &mut p.sidebar, &mut p.shell)
                .await;
        }

        let texts: Vec<_> = p.renderer.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "…", "two", "…"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_optimistic_update() {
        let backend = ScriptedBackend::new().with_send_failure();
        let mut p = parts();
        let mut composer = Composer::new();

        let outcome = composer
            .submit("hello", &backend, &mut p.renderer, &mut p.sidebar, &mut p.shell)
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                user_index: 0,
                error_index: 1
            }
        );
        let bubbles = p.renderer.pane().bubbles();
        assert_eq!(bubbles[0].role, Role::User);
        assert_eq!(bubbles[1].role, Role::Bot);
        assert_eq!(bubbles[1].text, NETWORK_ERROR);
        assert_eq!(p.sidebar.len(), 1);
    }
}
