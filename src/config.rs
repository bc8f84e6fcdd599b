use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::filter::{default_filters, Filter};
use crate::github::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    /// Shell command whose stdout is used as a token when no stored one exists.
    pub token_command: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            token_command: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            filters: default_filters(),
        }
    }
}

/// `<config dir>/gh-inbox`, home of the config file and the stored token.
pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("gh-inbox"))
}

fn config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Config::from_toml(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Config::default()
            }
        }
    }

    /// Parse a config file. An empty filter list falls back to the defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config = toml::from_str::<Config>(content)?;
        if config.filters.is_empty() {
            config.filters = default_filters();
        }
        if config.general.api_url.trim().is_empty() {
            config.general.api_url = DEFAULT_API_URL.to_string();
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        match self.general.timeout_secs {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }
}
