//! Scalar-or-list option values.
//!
//! Endpoints accept ids, symbols and convert currencies either as one value,
//! as a pre-joined `"A,B"` string, or as a list. [`OneOrMany`] captures all of
//! these so the shape is decided once, where the query is built.

use serde::{Deserialize, Serialize};

/// A single value or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// `true` when there is nothing to send: an empty string, an empty list,
    /// or a list of empty strings.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(s) => s.is_empty(),
            Self::Many(items) => items.iter().all(String::is_empty),
        }
    }

    /// Comma-join the values in their original order.
    ///
    /// Empty list entries are dropped so `["BTC", ""]` never yields a trailing
    /// comma.
    pub fn join(&self) -> String {
        match self {
            Self::One(s) => s.clone(),
            Self::Many(items) => items
                .iter()
                .filter(|s| !s.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Upper-cased copy, for currency codes.
    pub fn to_uppercase(&self) -> Self {
        match self {
            Self::One(s) => Self::One(s.to_uppercase()),
            Self::Many(items) => Self::Many(items.iter().map(|s| s.to_uppercase()).collect()),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<&String> for OneOrMany {
    fn from(s: &String) -> Self {
        Self::One(s.clone())
    }
}

impl From<u32> for OneOrMany {
    fn from(n: u32) -> Self {
        Self::One(n.to_string())
    }
}

impl From<u64> for OneOrMany {
    fn from(n: u64) -> Self {
        Self::One(n.to_string())
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(items: Vec<String>) -> Self {
        Self::Many(items)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(items: Vec<&str>) -> Self {
        Self::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<u64>> for OneOrMany {
    fn from(items: Vec<u64>) -> Self {
        Self::Many(items.iter().map(u64::to_string).collect())
    }
}

impl From<&[&str]> for OneOrMany {
    fn from(items: &[&str]) -> Self {
        Self::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany {
    fn from(items: [&str; N]) -> Self {
        Self::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[u64; N]> for OneOrMany {
    fn from(items: [u64; N]) -> Self {
        Self::Many(items.iter().map(u64::to_string).collect())
    }
}
