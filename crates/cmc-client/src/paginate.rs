//! Fetch-all pagination across rank windows.
//!
//! When a listing call asks for [`Limit::All`](cmc_core::Limit::All), the
//! facade first reads the number of active cryptocurrencies from the global
//! snapshot, splits `[1, total]` into fixed-size rank windows, requests every
//! window concurrently and merges the pages back into one response.
//!
//! ```text
//! total=250, size=100  ──►  start=1  start=101  start=201
//!                              │         │          │
//!                              └── try_join_all ────┘
//!                                        │
//!                          merge in window order ──► { data, metadata }
//! ```
//!
//! Assembly order comes from the window index, never from completion order,
//! and the metadata of the last window wins.

use std::future::Future;

use cmc_core::{CmcError, Result, Structure};
use futures_util::future::try_join_all;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Page size of the public ticker endpoint.
pub const LEGACY_WINDOW_SIZE: u32 = 100;

/// Maximum page size of the pro listings endpoint.
pub const PRO_WINDOW_SIZE: u32 = 5000;

/// A contiguous slice of the ranked listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWindow {
    /// 1-based start rank.
    pub start: u32,
    pub size: u32,
}

/// Windows covering `[1, total]` with no gaps or overlaps.
///
/// The last window may extend past `total`; the API simply returns fewer rows.
pub fn rank_windows(total: u32, size: u32) -> Vec<RankWindow> {
    if size == 0 {
        return Vec::new();
    }
    (1..=total)
        .step_by(size as usize)
        .map(|start| RankWindow { start, size })
        .collect()
}

/// Read `data.active_cryptocurrencies` from a global snapshot.
pub fn active_cryptocurrencies(global: &Value) -> Result<u32> {
    global
        .pointer("/data/active_cryptocurrencies")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            CmcError::transport("global snapshot has no numeric data.active_cryptocurrencies")
        })
}

// ---------------------------------------------------------------------------
// MergedResult
// ---------------------------------------------------------------------------

/// The merged body of a fetch-all call.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedResult {
    /// Object keyed by id, or an array in rank order.
    pub data: Value,
    /// Metadata of the last page that carried any.
    pub metadata: Option<Value>,
    metadata_key: &'static str,
}

impl MergedResult {
    /// Render back into the API's response shape.
    pub fn into_value(self) -> Value {
        let mut body = Map::new();
        body.insert("data".into(), self.data);
        if let Some(metadata) = self.metadata {
            body.insert(self.metadata_key.into(), metadata);
        }
        Value::Object(body)
    }
}

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// Merge policy for one fetch-all call.
#[derive(Debug, Clone, Copy)]
pub struct Merger {
    shape: Structure,
    metadata_key: &'static str,
}

impl Merger {
    /// `metadata_key` names the per-page metadata field
    /// (`metadata` on the public API, `status` on the pro API).
    pub fn new(shape: Structure, metadata_key: &'static str) -> Self {
        Self {
            shape,
            metadata_key,
        }
    }

    /// Request every window concurrently and merge the pages.
    ///
    /// The first failing page fails the whole call; no partial result is
    /// returned.
    pub async fn fetch_all<F, Fut>(&self, total: u32, size: u32, fetch_page: F) -> Result<MergedResult>
    where
        F: Fn(RankWindow) -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let windows = rank_windows(total, size);
        info!(
            "[paginate] fetching {total} records in {} window(s) of {size}",
            windows.len()
        );

        let pages = try_join_all(windows.into_iter().map(fetch_page)).await?;
        Ok(self.merge(pages))
    }

    /// Merge pages that are already in window order.
    pub fn merge(&self, pages: Vec<Value>) -> MergedResult {
        let mut metadata = None;
        let mut by_id = Map::new();
        let mut rows = Vec::new();

        for (page_index, mut page) in pages.into_iter().enumerate() {
            if let Some(meta) = page.get_mut(self.metadata_key).map(Value::take) {
                metadata = Some(meta);
            }
            let data = page.get_mut("data").map(Value::take).unwrap_or(Value::Null);
            match self.shape {
                Structure::Dictionary => merge_keyed(&mut by_id, page_index, data),
                Structure::Array => append_rows(&mut rows, data),
            }
        }

        let data = match self.shape {
            Structure::Dictionary => Value::Object(by_id),
            Structure::Array => Value::Array(rows),
        };
        debug!("[paginate] merged {} record(s)", record_count(&data));

        MergedResult {
            data,
            metadata,
            metadata_key: self.metadata_key,
        }
    }
}

/// Insert each record under its `id`. Later pages overwrite earlier ones.
///
/// A record without an id keeps its object key, or `{page}:{index}` when the
/// page is an array, so id-less rows from different pages never collide.
fn merge_keyed(into: &mut Map<String, Value>, page_index: usize, data: Value) {
    let records: Vec<(String, Value)> = match data {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("{page_index}:{i}"), v))
            .collect(),
        _ => return,
    };

    for (fallback_key, record) in records {
        let key = match record_id(&record) {
            Some(id) => id,
            None => {
                warn!("[paginate] record without id in page {page_index}, keyed as {fallback_key}");
                fallback_key
            }
        };
        into.insert(key, record);
    }
}

/// Append records keeping intra-page order.
fn append_rows(into: &mut Vec<Value>, data: Value) {
    match data {
        Value::Array(items) => into.extend(items),
        Value::Object(map) => into.extend(map.into_iter().map(|(_, v)| v)),
        _ => {}
    }
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn record_count(data: &Value) -> usize {
    match data {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}
