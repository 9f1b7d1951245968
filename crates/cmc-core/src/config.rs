//! Configuration parsing for the CoinMarketCap client.
//!
//! Settings come from a single JSON file with an optional `logging` block and
//! a `client` block. Every client field has a per-flavor default, so the
//! smallest useful pro config only names the API key.
//!
//! # Example config
//!
//! ```json
//! {
//!   "logging": { "level": "debug", "dir": "/tmp/cmc" },
//!   "client": {
//!     "api": "pro",
//!     "api_key": "…",
//!     "headers": { "User-Agent": "cmc-cli/0.1" },
//!     "timeout_secs": 30
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::CmcError;
use crate::types::ApiFlavor;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging settings (level, optional file directory).
    #[serde(default)]
    pub logging: LogConfig,

    /// API client settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Logging block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    pub level: Option<String>,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn effective_level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}

/// Settings for one API client.
///
/// Captured once when a client is built; nothing here changes afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Which API deployment to talk to.
    #[serde(default)]
    pub api: ApiFlavor,

    /// Pro API key, sent as `X-CMC_PRO_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override (tests, proxies, the sandbox API).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Version segment override (`v1`, `v2`, …).
    #[serde(default)]
    pub version: Option<String>,

    /// Extra request headers. These win over the built-in defaults.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout for the HTTP transport (seconds).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// A config for `flavor` with every other field at its default.
    pub fn new(flavor: ApiFlavor) -> Self {
        Self {
            api: flavor,
            ..Self::default()
        }
    }

    /// Builder-style API key setter.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder-style base URL setter.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Returns the base URL without a trailing slash.
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.api.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Returns the version segment without surrounding slashes.
    pub fn effective_version(&self) -> String {
        self.version
            .as_deref()
            .unwrap_or(self.api.default_version())
            .trim_matches('/')
            .to_string()
    }

    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), CmcError> {
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if self.api.requires_api_key() && !has_key {
            return Err(CmcError::Config(format!(
                "the {} API requires an api_key",
                self.api
            )));
        }
        Ok(())
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    tracing::debug!("[config] loaded {} (api={})", path.display(), config.client.api);
    Ok(config)
}
