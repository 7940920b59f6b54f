use crate::inline::render_chat_markdown;
use crate::wire::ApiMessage;
use pulldown_cmark_escape::{FmtWriter, escape_html};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One bubble in the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    /// What the user typed, or the raw reply text from the model.
    pub text: String,
    /// Rendered form, present on assistant bubbles only.
    pub html: Option<String>,
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            html: None,
            is_error: false,
        }
    }

    pub fn assistant(reply: impl Into<String>) -> Self {
        let text = reply.into();
        let html = render_chat_markdown(&text);
        Self {
            role: Role::Assistant,
            text,
            html: Some(html),
            is_error: false,
        }
    }

    pub fn error(message: &str) -> Self {
        let message = if message.is_empty() {
            "Something went wrong."
        } else {
            message
        };
        Self {
            role: Role::Assistant,
            text: format!("Error: {message}"),
            html: Some(error_html(message)),
            is_error: true,
        }
    }
}

/// `<p><strong>Error:</strong> MESSAGE</p>` with the message escaped.
pub fn error_html(message: &str) -> String {
    let mut html = String::from("<p><strong>Error:</strong> ");
    // writing into a String cannot fail
    let _ = escape_html(FmtWriter(&mut html), message);
    html.push_str("</p>");
    html
}

/// The append-only list of visible bubbles.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Earlier exchanges to send as context with the next request.
    ///
    /// Bubbles are read two at a time from the start. A pair is kept only
    /// when it is a user bubble followed by a non-error assistant bubble;
    /// error bubbles and a trailing unpaired bubble are left out.
    pub fn context(&self) -> Vec<ApiMessage> {
        let mut context = Vec::new();
        for pair in self.messages.chunks_exact(2) {
            let (user, reply) = (&pair[0], &pair[1]);
            if user.role == Role::User && reply.role == Role::Assistant && !reply.is_error {
                context.push(ApiMessage::new(Role::User, user.text.trim()));
                context.push(ApiMessage::new(Role::Assistant, reply.text.trim()));
            }
        }
        context
    }
}
