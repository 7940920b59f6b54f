use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::time::Duration;
use std::{env, fs};

pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CoreConfig {
    pub listen_addr: String,
    /// Chat-completions endpoint requests are forwarded to.
    pub upstream_url: String,
    pub request_timeout_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4000".into(),
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
            request_timeout_secs: 60,
        }
    }
}

impl CoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub core: CoreConfig,
}

impl Config {
    pub fn load(config_file: &str) -> Result<Config, ConfigError> {
        let config_string = fs::read_to_string(config_file).map_err(|source| ConfigError::Read {
            path: config_file.to_string(),
            source,
        })?;
        Self::parse(config_file, &config_string)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(config_file: &str) -> Result<Config, ConfigError> {
        match Self::load(config_file) {
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = config_file, "config file not found, using defaults");
                Ok(Config::default())
            }
            other => other,
        }
    }

    fn parse(config_file: &str, raw: &str) -> Result<Config, ConfigError> {
        let config_string = substitute_env(raw, env::vars());
        toml::from_str(&config_string).map_err(|source| ConfigError::Parse {
            path: config_file.to_string(),
            source,
        })
    }
}

/// Replace each `$NAME` with the value of `NAME`. Longer names go first so a
/// variable never clobbers the prefix of another.
pub fn substitute_env(raw: &str, vars: impl IntoIterator<Item = (String, String)>) -> String {
    let mut vars: Vec<_> = vars.into_iter().collect();
    vars.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
    let mut out = raw.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("${k}"), &v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::parse("x.toml", "").unwrap(), Config::default());
    }

    #[test]
    fn partial_core_keeps_other_defaults() {
        let config = Config::parse("x.toml", "[core]\nlisten_addr = \"127.0.0.1:9000\"\n").unwrap();
        assert_eq!(config.core.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.core.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.core.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_substitution_prefers_longest_name() {
        let vars = vec![
            ("PORT".to_string(), "1".to_string()),
            ("PORT_TWO".to_string(), "2".to_string()),
        ];
        assert_eq!(substitute_env("a=$PORT b=$PORT_TWO", vars), "a=1 b=2");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[core\n").unwrap();
        let err = Config::load_or_default(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
