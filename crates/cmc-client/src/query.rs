//! Query-parameter map and URL query encoding.
//!
//! [`Query`] keeps parameters in insertion order so the same call always
//! renders the same URL. Values are URL-encoded piecewise around commas:
//! list parameters such as `symbol=BTC,ETH` keep their separators readable
//! while everything inside each item is escaped.

/// Ordered query-parameter map.
///
/// Empty values are never stored, so an omitted option cannot leak into the
/// URL as `key=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an earlier value in place.
    ///
    /// An empty `value` removes the key instead.
    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.params.retain(|(k, _)| *k != key);
            return;
        }
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key, value)),
        }
    }

    /// Set `key` only when `value` is present.
    pub fn insert_opt<V: ToString>(&mut self, key: &'static str, value: Option<V>) {
        if let Some(v) = value {
            self.insert(key, v.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Render as `k1=v1&k2=v2`, without a leading `?`.
    pub fn encode(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), encode_list_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode each comma-separated item and re-join with literal commas.
fn encode_list_value(value: &str) -> String {
    value
        .split(',')
        .map(|item| urlencoding::encode(item).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}
