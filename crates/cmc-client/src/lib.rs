//! # cmc-client
//!
//! Async clients for the CoinMarketCap public and pro HTTP APIs.
//!
//! Each facade turns caller options into one or more GET requests:
//!
//! ```text
//! options ──► normalize / validate ──► Dispatcher ──► Transport ──► JSON
//!                                          ▲
//!                        Limit::All ───────┘ (one request per rank window,
//!                                             merged by paginate)
//! ```
//!
//! | Facade           | API       | Default base                        |
//! |------------------|-----------|-------------------------------------|
//! | [`LegacyClient`] | public v2 | `https://api.coinmarketcap.com`     |
//! | [`ProClient`]    | pro v1    | `https://pro-api.coinmarketcap.com` |
//!
//! Validation errors are raised before any request is sent.

pub mod dispatch;
pub mod legacy;
pub mod normalize;
pub mod paginate;
pub mod pro;
pub mod query;
pub mod transport;
pub mod validate;

#[cfg(test)]
mod testing;

use async_trait::async_trait;
use cmc_core::Result;

pub use cmc_core::{CmcError, Limit, OneOrMany, Structure};
pub use dispatch::{Dispatcher, Headers, RequestSpec};
pub use legacy::{LegacyClient, TickerRequest};
pub use paginate::MergedResult;
pub use pro::{IdMapRequest, MetadataRequest, ProClient, QuotesRequest, TickersRequest};
pub use query::Query;
pub use transport::HttpTransport;

/// Sends a GET and returns the raw body.
///
/// [`HttpTransport`] is the production implementation; tests inject stubs.
/// Implementations map every network failure to
/// [`CmcError::Transport`](cmc_core::CmcError::Transport).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<String>;
}
