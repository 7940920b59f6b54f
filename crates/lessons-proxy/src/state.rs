use std::sync::Arc;

use crate::config::Config;

pub struct AppStateInner {
    pub cfg: Config,
    pub client: reqwest::Client,
    pub api_key: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    /// A blank key counts as no key.
    pub fn new(cfg: Config, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                client: reqwest::Client::new(),
                api_key,
            }),
        }
    }

    pub fn cfg(&self) -> &Config {
        &self.inner.as_ref().cfg
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.inner.as_ref().client
    }

    pub fn api_key(&self) -> Option<&str> {
        self.inner.as_ref().api_key.as_deref()
    }
}
