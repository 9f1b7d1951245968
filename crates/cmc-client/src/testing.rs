//! Recording transport stub for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use cmc_core::Result;
use serde_json::Value;

use crate::Transport;
use crate::dispatch::Headers;

/// One request seen by the stub.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub url: String,
    pub headers: Headers,
}

type Handler = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Answers every GET through a closure over the URL and records the call.
pub(crate) struct StubTransport {
    handler: Handler,
    calls: Mutex<Vec<Call>>,
}

impl StubTransport {
    /// Stub whose handler returns JSON values.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        Self::raw(move |url| handler(url).map(|v| v.to_string()))
    }

    /// Stub whose handler returns the raw body.
    pub fn raw<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &str, headers: &Headers) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            headers: headers.clone(),
        });
        (self.handler)(url)
    }
}

/// URL path without the query string.
pub(crate) fn path_of(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Raw (still encoded) value of `key` in the URL's query string.
pub(crate) fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}
