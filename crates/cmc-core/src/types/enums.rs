//! Enumerations for request options and API flavors.
//!
//! Each option enum renders to the exact string the API expects through
//! `as_str()`, which is what the query builder consumes.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// API flavors
// ---------------------------------------------------------------------------

/// Which deployment of the API a client talks to.
///
/// The public API is keyless and versioned under `/v2`; the pro API requires
/// an `X-CMC_PRO_API_KEY` header and lives under `/v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFlavor {
    Legacy,
    #[default]
    Pro,
}

impl ApiFlavor {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Legacy => "https://api.coinmarketcap.com",
            Self::Pro => "https://pro-api.coinmarketcap.com",
        }
    }

    pub fn default_version(self) -> &'static str {
        match self {
            Self::Legacy => "v2",
            Self::Pro => "v1",
        }
    }

    /// Top-level key that carries per-response metadata.
    pub fn metadata_key(self) -> &'static str {
        match self {
            Self::Legacy => "metadata",
            Self::Pro => "status",
        }
    }

    pub fn requires_api_key(self) -> bool {
        matches!(self, Self::Pro)
    }
}

impl fmt::Display for ApiFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

// ---------------------------------------------------------------------------
// Limit
// ---------------------------------------------------------------------------

/// Result-count limit for listing endpoints.
///
/// The API treats `limit=0` as "return everything". That sentinel is kept as
/// its own variant so a real count can never be mistaken for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// Fetch the full listing by paging through rank windows.
    All,
    /// Return at most this many results.
    Count(NonZeroU32),
}

impl Limit {
    pub fn is_all(self) -> bool {
        matches!(self, Self::All)
    }

    /// The numeric limit to send, or `None` for [`Limit::All`].
    pub fn count(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Count(n) => Some(n.get()),
        }
    }
}

impl From<u32> for Limit {
    /// `0` is the fetch-all sentinel; anything else is a literal count.
    fn from(n: u32) -> Self {
        NonZeroU32::new(n).map_or(Self::All, Self::Count)
    }
}

// ---------------------------------------------------------------------------
// Response structure
// ---------------------------------------------------------------------------

/// Shape of the `data` field in ticker responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    /// Records keyed by id.
    #[default]
    Dictionary,
    /// Records in rank order.
    Array,
}

impl Structure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Array => "array",
        }
    }
}

// ---------------------------------------------------------------------------
// Pro API option enums
// ---------------------------------------------------------------------------

/// `listing_status` for the id map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// `sort_dir` for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// `cryptocurrency_type` filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptocurrencyType {
    #[default]
    All,
    Coins,
    Tokens,
}

impl CryptocurrencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Coins => "coins",
            Self::Tokens => "tokens",
        }
    }
}
