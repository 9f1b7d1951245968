//! Request construction and dispatch.
//!
//! Every facade method ends up here: [`Dispatcher::request`] assembles a
//! [`RequestSpec`] from the immutable client configuration, and
//! [`Dispatcher::get`] sends it through the injected [`Transport`] and parses
//! the body as JSON.
//!
//! ```text
//! {base_url}/{version}{resource}[/{segment}][?{query}]
//! ```

use std::sync::Arc;

use cmc_core::Result;
use cmc_core::config::ClientConfig;
use serde_json::Value;
use tracing::debug;

use crate::Transport;
use crate::query::Query;

/// Header carrying the pro API key.
pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Ordered request headers with case-insensitive replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing one with the same name
    /// (ignoring ASCII case).
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Defaults, then the API key, then caller overrides.
    ///
    /// The key is only sent to flavors that authenticate; a keyless host never
    /// sees it.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut headers = Self::new();
        headers.set("Accept", "application/json");
        headers.set("Accept-Charset", "utf-8");
        if config.api.requires_api_key() {
            if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
                headers.set(API_KEY_HEADER, key);
            }
        }
        for (name, value) in &config.headers {
            headers.set(name.as_str(), value.as_str());
        }
        headers
    }
}

// ---------------------------------------------------------------------------
// RequestSpec
// ---------------------------------------------------------------------------

/// A fully-assembled GET request, ready for the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec<'a> {
    pub base_url: &'a str,
    pub version: &'a str,
    /// Resource path with a leading slash (e.g. `/cryptocurrency/map`).
    pub resource_path: &'a str,
    /// Optional trailing path segment (legacy `/ticker/{id}`).
    pub path_segment: Option<&'a str>,
    pub query: &'a Query,
    pub headers: &'a Headers,
}

impl RequestSpec<'_> {
    /// Every request this client issues is a GET.
    pub const METHOD: &'static str = "GET";

    /// Render the final URL.
    pub fn url(&self) -> String {
        let mut url = format!("{}/{}{}", self.base_url, self.version, self.resource_path);
        if let Some(segment) = self.path_segment {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query.encode());
        }
        url
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Immutable request context shared by every call of a client.
///
/// Cloning is cheap; the transport is behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    base_url: String,
    version: String,
    headers: Headers,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.effective_base_url(),
            version: config.effective_version(),
            headers: Headers::from_config(config),
            transport,
        }
    }

    /// Assemble a request for `resource` without sending it.
    pub fn request<'a>(
        &'a self,
        resource: &'a str,
        segment: Option<&'a str>,
        query: &'a Query,
    ) -> RequestSpec<'a> {
        RequestSpec {
            base_url: &self.base_url,
            version: &self.version,
            resource_path: resource,
            path_segment: segment,
            query,
            headers: &self.headers,
        }
    }

    /// Send a request and parse the body as JSON.
    pub async fn send(&self, spec: &RequestSpec<'_>) -> Result<Value> {
        let url = spec.url();
        debug!("[dispatch] {} {url}", RequestSpec::METHOD);

        let body = self.transport.get(&url, spec.headers).await?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(value)
    }

    /// Build and send in one step.
    pub async fn get(&self, resource: &str, segment: Option<&str>, query: &Query) -> Result<Value> {
        let spec = self.request(resource, segment, query);
        self.send(&spec).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
