//! Option normalization and identifier selection.
//!
//! Turns caller-facing option shapes into the canonical strings that go into a
//! [`Query`]. Nothing here performs I/O.

use cmc_core::{CmcError, OneOrMany, Result};

use crate::query::Query;

/// Comma-join a list option. Returns `None` for an empty value so the key is
/// left out of the query.
pub fn normalize_list(value: &OneOrMany) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.join())
    }
}

/// Like [`normalize_list`], but upper-cases currency codes first.
pub fn normalize_currency(value: &OneOrMany) -> Option<String> {
    normalize_list(&value.to_uppercase())
}

/// Which assets a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Comma-joined numeric ids.
    Id(String),
    /// Comma-joined ticker symbols.
    Symbol(String),
}

impl Selector {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Symbol(_) => "symbol",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Symbol(v) => v,
        }
    }

    /// Write the selector into `query` under `id` or `symbol`.
    pub fn apply(&self, query: &mut Query) {
        query.insert(self.key(), self.value());
    }
}

/// Pick exactly one of `id` / `symbol`.
///
/// Used by endpoints that look up specific assets (metadata, quotes).
pub fn select_identifier(
    id: Option<&OneOrMany>,
    symbol: Option<&OneOrMany>,
) -> Result<Selector> {
    select_identifier_opt(id, symbol)?.ok_or_else(|| {
        CmcError::MissingSelector("either id or symbol is required".into())
    })
}

/// Pick at most one of `id` / `symbol`; both empty is allowed.
pub fn select_identifier_opt(
    id: Option<&OneOrMany>,
    symbol: Option<&OneOrMany>,
) -> Result<Option<Selector>> {
    let id = id.and_then(normalize_list);
    let symbol = symbol.and_then(normalize_list);

    match (id, symbol) {
        (Some(_), Some(_)) => Err(CmcError::ConflictingSelector(
            "id and symbol cannot be passed in at the same time".into(),
        )),
        (Some(id), None) => Ok(Some(Selector::Id(id))),
        (None, Some(symbol)) => Ok(Some(Selector::Symbol(symbol))),
        (None, None) => Ok(None),
    }
}
