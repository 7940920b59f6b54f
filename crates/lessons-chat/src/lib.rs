//! Lessons chat
//!
//! The runtime side of the lesson site: the assistant chat widget. Replies from
//! the model are untrusted text, so they only ever reach the page through
//! [`render_chat_markdown`], a small single-pass renderer that escapes first
//! and then recognises a handful of inline forms.
//!

pub mod error;
pub mod inline;
pub mod message;
pub mod page;
pub mod state;
pub mod transport;
pub mod widget;
pub mod wire;

pub use error::{ChatError, StateError};
pub use inline::render_chat_markdown;
pub use message::{ChatMessage, Conversation, Role};
pub use page::{Heading, PageContext, PageId};
pub use state::{FileStateStore, MemoryStateStore, StateStore, UiState};
pub use transport::{ChatConfig, ChatTransport, Endpoint, HttpTransport};
pub use widget::{ChatWidget, SubmitOutcome};
pub use wire::{ApiMessage, ChatCompletion, ChatRequest};
