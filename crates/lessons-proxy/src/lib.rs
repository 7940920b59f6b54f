//! Lessons proxy
//!
//! Small HTTP service that lets the lesson site talk to the chat-completions
//! API without shipping a key to the browser. It accepts the chat request on
//! `/api/chat`, adds the server-held key and passes the upstream reply back.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ConfigError, ProxyError};
pub use state::AppState;

/// Environment variable the upstream key is read from.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    (header::ACCESS_CONTROL_MAX_AGE, "86400"),
];

pub fn router(app_state: AppState) -> Router {
    let timeout_layer = TimeoutLayer::new(app_state.cfg().core.request_timeout());

    // Later layers wrap earlier ones, so CORS headers land on timeouts too.
    let mut router = Router::new()
        .merge(routes::router())
        .layer(timeout_layer);
    for (name, value) in CORS_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }
    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
