//! Typed error definitions for the CoinMarketCap client.
//!
//! Validation variants are raised before any request leaves the process and
//! signal a caller bug; they are never worth retrying. [`CmcError::Transport`]
//! wraps everything that went wrong on the wire or while reading the body.

use thiserror::Error;

/// Domain-specific errors for the CoinMarketCap client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmcError {
    /// Two selectors that exclude each other were both supplied
    /// (`id` + `symbol`, or `currency` + `id`).
    #[error("conflicting selector: {0}")]
    ConflictingSelector(String),

    /// An endpoint that targets specific assets got neither `id` nor `symbol`.
    #[error("missing selector: {0}")]
    MissingSelector(String),

    /// Listing-window options combined with single-asset options, or a start
    /// offset combined with the fetch-all limit.
    #[error("incompatible options: {0}")]
    IncompatibleOptions(String),

    /// A symbol could not be resolved to a numeric id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network failure, non-JSON body, or a snapshot missing a required field.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),
}

impl CmcError {
    /// Returns `true` for errors raised by argument validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ConflictingSelector(_)
                | Self::MissingSelector(_)
                | Self::IncompatibleOptions(_)
                | Self::NotFound(_)
        )
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<serde_json::Error> for CmcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("invalid JSON body: {err}"))
    }
}

/// Result alias used by every fallible library call.
pub type Result<T> = std::result::Result<T, CmcError>;
