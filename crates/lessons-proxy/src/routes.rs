use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use crate::error::ProxyError;
use crate::state::AppState;

pub const CHAT_PATH: &str = "/api/chat";

pub fn router() -> Router<AppState> {
    Router::new().route(
        CHAT_PATH,
        post(chat).options(preflight).fallback(method_not_allowed),
    )
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::CONTENT_TYPE, "text/plain")],
        "Method not allowed",
    )
        .into_response()
}

/// Forward a chat-completion request upstream with the server's key and
/// mirror the upstream status. A non-JSON upstream body becomes `{}`.
async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ProxyError> {
    let key = state.api_key().ok_or(ProxyError::MissingKey)?;
    let payload: Value = serde_json::from_slice(&body).map_err(|_| ProxyError::InvalidJson)?;

    let upstream_url = &state.cfg().core.upstream_url;
    tracing::debug!(url = %upstream_url, bytes = body.len(), "forwarding chat request");
    let upstream = state
        .client()
        .post(upstream_url)
        .bearer_auth(key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| ProxyError::Upstream(e.to_string()))?;

    let status = upstream.status();
    let data = upstream
        .json::<Value>()
        .await
        .unwrap_or_else(|_| json!({}));
    if !status.is_success() {
        tracing::info!(%status, "upstream returned an error status");
    }
    Ok((status, Json(data)).into_response())
}
