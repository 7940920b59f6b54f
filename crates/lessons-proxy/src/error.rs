use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;

/// Failures while handling a chat request. Each maps onto a JSON error body.
#[derive(Debug, Error, Diagnostic)]
pub enum ProxyError {
    #[error("OPENROUTER_API_KEY not configured")]
    #[diagnostic(code(lessons::proxy::missing_key))]
    MissingKey,

    #[error("Invalid JSON body")]
    #[diagnostic(code(lessons::proxy::invalid_json))]
    InvalidJson,

    #[error("{0}")]
    #[diagnostic(code(lessons::proxy::upstream))]
    Upstream(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingKey => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidJson => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::MissingKey => tracing::error!("{self}"),
            ProxyError::InvalidJson => tracing::debug!("rejected request body"),
            ProxyError::Upstream(reason) => tracing::warn!(%reason, "upstream request failed"),
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("error reading config file {path}")]
    #[diagnostic(code(lessons::proxy::config_read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file {path}")]
    #[diagnostic(
        code(lessons::proxy::config_parse),
        help("the file is TOML with a [core] table; $VARS are substituted from the environment")
    )]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
