use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ChatError {
    #[error("{status} {detail}")]
    #[diagnostic(code(lessons::chat::http))]
    Http { status: u16, detail: String },

    #[error("{0}")]
    #[diagnostic(code(lessons::chat::network))]
    Network(String),

    #[error("invalid chat response: {0}")]
    #[diagnostic(code(lessons::chat::decode))]
    Decode(String),

    #[error(
        "Set a chat proxy URL (LESSONS_CHAT_PROXY) or add your OpenRouter API key in settings."
    )]
    #[diagnostic(code(lessons::chat::no_endpoint))]
    NoEndpoint,
}

#[derive(Debug, Error, Diagnostic)]
pub enum StateError {
    #[error("failed to write ui state to {}", path.display())]
    #[diagnostic(code(lessons::state::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize ui state")]
    #[diagnostic(code(lessons::state::serialize))]
    Serialize(#[from] serde_json::Error),
}
