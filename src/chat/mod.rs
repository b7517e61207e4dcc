//! Conversation with the analysis assistant, grounded in the dashboard
//! currently held by the shared context.

use crate::backend::{ChatContext, ChatReply, ChatRequest, DashboardBackend};
use crate::context::{DashboardContext, DashboardSelection};
use crate::error::BackendError;

pub mod message;

pub use message::{AnalysisMode, ChatMessage, Role};

pub const GREETING: &str =
    "Hello! I'm your dashboard analysis assistant. Upload a file and I can help you analyze the data.";
pub const EMPTY_REPLY: &str = "Sorry, I got an empty response.";

/// Autoscroll follows new messages until the user jumps to the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    auto_scroll: bool,
    jump_to_top: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            auto_scroll: true,
            jump_to_top: false,
        }
    }
}

impl ScrollState {
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.jump_to_top = true;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.jump_to_top = false;
    }

    /// One-shot request to show the first message.
    pub fn take_jump_to_top(&mut self) -> bool {
        std::mem::take(&mut self.jump_to_top)
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    mode: AnalysisMode,
    in_flight: bool,
    seen_revision: u64,
    scroll: ScrollState,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            mode: AnalysisMode::General,
            in_flight: false,
            seen_revision: 0,
            scroll: ScrollState::default(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    /// Appends a readiness note whenever a new dashboard has been published
    /// since the last call. Returns whether a message was added.
    pub fn observe_context(&mut self, context: &DashboardContext) -> bool {
        if context.revision() == self.seen_revision {
            return false;
        }
        self.seen_revision = context.revision();
        if !context.is_ready() {
            return false;
        }

        self.messages
            .push(ChatMessage::assistant(ready_message(context.selection())));
        true
    }

    /// Records the user's message and returns the request to send, or `None`
    /// when the text is blank or a reply is still pending.
    pub fn begin_send(&mut self, text: &str, context: &DashboardContext) -> Option<ChatRequest> {
        if text.trim().is_empty() || self.in_flight {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::typing());
        self.in_flight = true;

        tracing::info!(analysis_type = self.mode.as_str(), "chat message sent");
        Some(ChatRequest {
            message: text.to_string(),
            analysis_type: self.mode,
            context: ChatContext::snapshot(context.selection(), self.mode),
        })
    }

    pub fn finish_send(&mut self, result: Result<ChatReply, BackendError>) {
        if !self.in_flight {
            tracing::warn!("chat reply arrived with no message in flight");
            return;
        }
        self.messages.retain(|message| !message.is_typing);
        self.in_flight = false;

        let text = match result {
            Ok(reply) => reply
                .response
                .filter(|response| !response.is_empty())
                .unwrap_or_else(|| EMPTY_REPLY.to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                err.user_message()
            }
        };
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Switches the analysis mode and, once a dashboard is ready, asks the
    /// mode's canned question.
    pub fn set_mode_and_prompt(
        &mut self,
        mode: AnalysisMode,
        context: &DashboardContext,
    ) -> Option<ChatRequest> {
        self.mode = mode;
        if !context.is_ready() {
            return None;
        }
        self.begin_send(mode.prompt(), context)
    }

    pub async fn send<B>(
        &mut self,
        text: &str,
        backend: &B,
        context: &DashboardContext,
    ) -> bool
    where
        B: DashboardBackend + ?Sized,
    {
        let Some(request) = self.begin_send(text, context) else {
            return false;
        };
        let result = backend.chat(request).await;
        self.finish_send(result);
        true
    }
}

fn ready_message(selection: &DashboardSelection) -> String {
    let subject = if !selection.metric.is_empty() {
        format!("the {} metric", selection.metric)
    } else if !selection.category.is_empty() {
        format!("the {} category", selection.category)
    } else if !selection.metrics.is_empty() {
        format!("{} metrics", selection.metrics.len())
    } else {
        "the uploaded data".to_string()
    };
    format!(
        "I'm ready to analyze the {} dashboard for {} server with {subject}. What would you like to know?",
        selection.dashboard,
        selection.server_name()
    )
}
