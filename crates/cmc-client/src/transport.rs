//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use cmc_core::config::ClientConfig;
use cmc_core::{CmcError, Result};
use tracing::warn;

use crate::Transport;
use crate::dispatch::Headers;

/// Default [`Transport`]: one shared `reqwest::Client`.
///
/// The body is returned regardless of status; the API reports errors in the
/// JSON `status`/`metadata` block, which callers get verbatim.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client honouring `timeout_secs`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| CmcError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: &Headers) -> Result<String> {
        let mut request = self.http.get(url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| CmcError::transport(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("[http] GET {url} returned {status}");
        }

        resp.text()
            .await
            .map_err(|e| CmcError::transport(format!("failed to read body of {url}: {e}")))
    }
}
