use crate::error::ChatError;
use crate::wire::{ChatCompletion, ChatRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "arcee-ai/trinity-large-preview:free";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Path of the chat route on the proxy.
pub const PROXY_CHAT_PATH: &str = "/api/chat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the chat proxy. Takes precedence over `api_key`.
    pub proxy_url: Option<String>,
    /// OpenRouter key for talking to the API directly.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Where a request goes and what credential it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub bearer: Option<String>,
}

impl ChatConfig {
    /// The proxy when one is set, otherwise the API with the user's key.
    /// `None` when neither is available.
    pub fn endpoint(&self) -> Option<Endpoint> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(proxy) = non_empty(&self.proxy_url) {
            let base = proxy.strip_suffix('/').unwrap_or(&proxy);
            return Some(Endpoint {
                url: format!("{base}{PROXY_CHAT_PATH}"),
                bearer: None,
            });
        }
        non_empty(&self.api_key).map(|key| Endpoint {
            url: OPENROUTER_URL.to_string(),
            bearer: Some(key),
        })
    }
}

#[async_trait]
pub trait ChatTransport {
    async fn complete(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ChatError>;
}

/// Posts requests as JSON over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ChatError> {
        let mut builder = self.client.post(&endpoint.url).json(request);
        if let Some(key) = &endpoint.bearer {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ChatError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}
