//! Pro API client.
//!
//! # Endpoints
//!
//! | Operation      | Method | Path                                 |
//! |----------------|--------|--------------------------------------|
//! | Id map         | GET    | `/v1/cryptocurrency/map`             |
//! | Metadata       | GET    | `/v1/cryptocurrency/info`            |
//! | Listings       | GET    | `/v1/cryptocurrency/listings/latest` |
//! | Quotes         | GET    | `/v1/cryptocurrency/quotes/latest`   |
//! | Global metrics | GET    | `/v1/global-metrics/quotes/latest`   |
//!
//! Every request carries the `X-CMC_PRO_API_KEY` header.

use std::sync::Arc;

use cmc_core::config::ClientConfig;
use cmc_core::{
    ApiFlavor, CryptocurrencyType, Limit, ListingStatus, OneOrMany, Result, SortDir, Structure,
};
use serde_json::Value;
use tracing::info;

use crate::Transport;
use crate::dispatch::Dispatcher;
use crate::normalize::{normalize_currency, select_identifier, select_identifier_opt};
use crate::paginate::{self, Merger, PRO_WINDOW_SIZE, RankWindow};
use crate::query::Query;
use crate::transport::HttpTransport;
use crate::validate::check_fetch_all_offset;

const MAP_PATH: &str = "/cryptocurrency/map";
const INFO_PATH: &str = "/cryptocurrency/info";
const LISTINGS_PATH: &str = "/cryptocurrency/listings/latest";
const QUOTES_PATH: &str = "/cryptocurrency/quotes/latest";
const GLOBAL_PATH: &str = "/global-metrics/quotes/latest";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Options for [`ProClient::id_map`].
#[derive(Debug, Clone, Default)]
pub struct IdMapRequest {
    pub listing_status: Option<ListingStatus>,
    pub start: Option<u32>,
    /// [`Limit::All`] leaves the limit to the server.
    pub limit: Option<Limit>,
    /// When set, only `symbol` and `listing_status` are sent.
    pub symbol: Option<OneOrMany>,
    /// `id` or `cmc_rank`.
    pub sort: Option<String>,
}

/// Options for [`ProClient::metadata`]. Exactly one of `id` / `symbol`.
#[derive(Debug, Clone, Default)]
pub struct MetadataRequest {
    pub id: Option<OneOrMany>,
    pub symbol: Option<OneOrMany>,
}

/// Options for [`ProClient::tickers`].
#[derive(Debug, Clone, Default)]
pub struct TickersRequest {
    pub start: Option<u32>,
    /// Page size, or [`Limit::All`] to fetch every active listing.
    pub limit: Option<Limit>,
    pub convert: Option<OneOrMany>,
    /// `market_cap`, `name`, `symbol`, `date_added`, `price`, ...
    pub sort: Option<String>,
    pub sort_dir: Option<SortDir>,
    pub cryptocurrency_type: Option<CryptocurrencyType>,
}

/// Options for [`ProClient::quotes`]. Exactly one of `id` / `symbol`.
#[derive(Debug, Clone, Default)]
pub struct QuotesRequest {
    pub id: Option<OneOrMany>,
    pub symbol: Option<OneOrMany>,
    pub convert: Option<OneOrMany>,
}

/// Options for [`ProClient::global`].
#[derive(Debug, Clone, Default)]
pub struct GlobalRequest {
    pub convert: Option<OneOrMany>,
}

impl MetadataRequest {
    pub fn ids(id: impl Into<OneOrMany>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn symbols(symbol: impl Into<OneOrMany>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }
}

impl QuotesRequest {
    pub fn ids(id: impl Into<OneOrMany>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn symbols(symbol: impl Into<OneOrMany>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }

    pub fn with_convert(mut self, convert: impl Into<OneOrMany>) -> Self {
        self.convert = Some(convert.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ProClient
// ---------------------------------------------------------------------------

/// Client for the pro API.
#[derive(Debug, Clone)]
pub struct ProClient {
    dispatcher: Dispatcher,
}

impl ProClient {
    /// Build a client backed by [`HttpTransport`].
    ///
    /// Fails with [`CmcError::Config`](cmc_core::CmcError::Config) when no
    /// API key is configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let config = pro_config(config);
        config.validate()?;
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self {
            dispatcher: Dispatcher::new(&config, Arc::new(transport)),
        })
    }

    /// Build a client over a caller-provided transport. The API key check
    /// still applies.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let config = pro_config(config);
        config.validate()?;
        Ok(Self {
            dispatcher: Dispatcher::new(&config, transport),
        })
    }

    /// Map symbols to CoinMarketCap ids.
    pub async fn id_map(&self, request: &IdMapRequest) -> Result<Value> {
        check_fetch_all_offset(request.start, request.limit)?;
        let selector = select_identifier_opt(None, request.symbol.as_ref())?;

        let mut query = Query::new();
        query.insert_opt("listing_status", request.listing_status.map(ListingStatus::as_str));
        match selector {
            Some(symbol) => symbol.apply(&mut query),
            None => {
                query.insert_opt("start", request.start.filter(|s| *s != 0));
                query.insert_opt("limit", request.limit.and_then(Limit::count));
                query.insert_opt("sort", request.sort.as_deref());
            }
        }
        self.dispatcher.get(MAP_PATH, None, &query).await
    }

    /// Static metadata (logo, description, urls) for specific assets.
    pub async fn metadata(&self, request: &MetadataRequest) -> Result<Value> {
        let selector = select_identifier(request.id.as_ref(), request.symbol.as_ref())?;
        let mut query = Query::new();
        selector.apply(&mut query);
        self.dispatcher.get(INFO_PATH, None, &query).await
    }

    /// Latest listings, one page or every active listing.
    pub async fn tickers(&self, request: &TickersRequest) -> Result<Value> {
        check_fetch_all_offset(request.start, request.limit)?;

        if request.limit.is_some_and(Limit::is_all) {
            return self.tickers_all(request).await;
        }

        let mut query = Query::new();
        query.insert_opt("start", request.start.filter(|s| *s != 0));
        query.insert_opt("limit", request.limit.and_then(Limit::count));
        listing_options(&mut query, request);
        self.dispatcher.get(LISTINGS_PATH, None, &query).await
    }

    /// Latest quotes for specific assets.
    pub async fn quotes(&self, request: &QuotesRequest) -> Result<Value> {
        let selector = select_identifier(request.id.as_ref(), request.symbol.as_ref())?;
        let mut query = Query::new();
        selector.apply(&mut query);
        query.insert_opt("convert", request.convert.as_ref().and_then(normalize_currency));
        self.dispatcher.get(QUOTES_PATH, None, &query).await
    }

    /// Global market metrics.
    pub async fn global(&self, request: &GlobalRequest) -> Result<Value> {
        let mut query = Query::new();
        query.insert_opt("convert", request.convert.as_ref().and_then(normalize_currency));
        self.dispatcher.get(GLOBAL_PATH, None, &query).await
    }

    /// Number of active cryptocurrencies, from the global metrics.
    pub async fn total_active_cryptocurrencies(&self) -> Result<u32> {
        let global = self.global(&GlobalRequest::default()).await?;
        paginate::active_cryptocurrencies(&global)
    }

    async fn tickers_all(&self, request: &TickersRequest) -> Result<Value> {
        let total = self.total_active_cryptocurrencies().await?;
        info!("[pro] fetching all {total} listings");

        let merger = Merger::new(Structure::Array, ApiFlavor::Pro.metadata_key());
        let dispatcher = &self.dispatcher;
        let merged = merger
            .fetch_all(total, PRO_WINDOW_SIZE, |window| {
                let query = listings_page_query(window, request);
                async move { dispatcher.get(LISTINGS_PATH, None, &query).await }
            })
            .await?;
        Ok(merged.into_value())
    }
}

fn pro_config(config: &ClientConfig) -> ClientConfig {
    ClientConfig {
        api: ApiFlavor::Pro,
        ..config.clone()
    }
}

/// Options shared by single-page and fetch-all listing requests.
fn listing_options(query: &mut Query, request: &TickersRequest) {
    query.insert_opt("convert", request.convert.as_ref().and_then(normalize_currency));
    query.insert_opt("sort", request.sort.as_deref().filter(|s| !s.is_empty()));
    query.insert_opt("sort_dir", request.sort_dir.map(SortDir::as_str));
    query.insert_opt(
        "cryptocurrency_type",
        request.cryptocurrency_type.map(CryptocurrencyType::as_str),
    );
}

fn listings_page_query(window: RankWindow, request: &TickersRequest) -> Query {
    let mut query = Query::new();
    query.insert("start", window.start.to_string());
    query.insert("limit", window.size.to_string());
    listing_options(&mut query, request);
    query
}
