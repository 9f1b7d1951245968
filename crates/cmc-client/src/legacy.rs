//! Public (keyless) API client.
//!
//! # Endpoints
//!
//! | Operation | Method | Path              |
//! |-----------|--------|-------------------|
//! | Listings  | GET    | `/v2/listings`    |
//! | Ticker(s) | GET    | `/v2/ticker[/id]` |
//! | Global    | GET    | `/v2/global`      |
//!
//! `ticker` is the only call with real option logic: it validates the option
//! mix, resolves a `currency` symbol to an id through `/listings`, and pages
//! through the whole ranking when asked for [`Limit::All`].

use std::sync::Arc;

use cmc_core::config::ClientConfig;
use cmc_core::{ApiFlavor, Limit, OneOrMany, Result, Structure};
use serde_json::Value;
use tracing::info;

use crate::Transport;
use crate::dispatch::Dispatcher;
use crate::normalize::normalize_currency;
use crate::paginate::{self, LEGACY_WINDOW_SIZE, Merger, RankWindow};
use crate::query::Query;
use crate::transport::HttpTransport;
use crate::validate::{resolve_symbol, validate_ticker};

const LISTINGS_PATH: &str = "/listings";
const TICKER_PATH: &str = "/ticker";
const GLOBAL_PATH: &str = "/global";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Options for [`LegacyClient::ticker`].
///
/// `start`, `limit` and `sort` page through the ranking; `currency` and `id`
/// pick one asset. The two groups exclude each other.
#[derive(Debug, Clone, Default)]
pub struct TickerRequest {
    /// Return results from this rank and above (1-based; `0` means unset).
    pub start: Option<u32>,
    /// Result count, or [`Limit::All`] to page through everything.
    pub limit: Option<Limit>,
    /// `id`, `rank`, `volume_24h` or `percent_change_24h`.
    pub sort: Option<String>,
    pub structure: Option<Structure>,
    /// Quote currencies (upper-cased before sending).
    pub convert: Option<OneOrMany>,
    /// Ticker symbol, resolved to an id through `/listings`.
    pub currency: Option<String>,
    pub id: Option<u64>,
}

/// Options for [`LegacyClient::global`].
#[derive(Debug, Clone, Default)]
pub struct GlobalRequest {
    pub convert: Option<OneOrMany>,
}

impl GlobalRequest {
    pub fn convert(convert: impl Into<OneOrMany>) -> Self {
        Self {
            convert: Some(convert.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// LegacyClient
// ---------------------------------------------------------------------------

/// Client for the public API.
#[derive(Debug, Clone)]
pub struct LegacyClient {
    dispatcher: Dispatcher,
}

impl LegacyClient {
    /// Build a client backed by [`HttpTransport`].
    ///
    /// The config's `api` field is ignored; public API defaults always apply.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client over a caller-provided transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let config = ClientConfig {
            api: ApiFlavor::Legacy,
            ..config.clone()
        };
        Self {
            dispatcher: Dispatcher::new(&config, transport),
        }
    }

    /// All active listings (`id`, `name`, `symbol`, `website_slug`).
    pub async fn listings(&self) -> Result<Value> {
        self.dispatcher.get(LISTINGS_PATH, None, &Query::new()).await
    }

    /// Global market snapshot.
    pub async fn global(&self, request: &GlobalRequest) -> Result<Value> {
        let mut query = Query::new();
        query.insert_opt("convert", request.convert.as_ref().and_then(normalize_currency));
        self.dispatcher.get(GLOBAL_PATH, None, &query).await
    }

    /// Number of active cryptocurrencies, from the global snapshot.
    pub async fn total_active_cryptocurrencies(&self) -> Result<u32> {
        let global = self.global(&GlobalRequest::default()).await?;
        paginate::active_cryptocurrencies(&global)
    }

    /// Ticker data for a page of the ranking, a single asset, or everything.
    pub async fn ticker(&self, request: &TickerRequest) -> Result<Value> {
        validate_ticker(request)?;

        let convert = request.convert.as_ref().and_then(normalize_currency);

        let mut id = request.id;
        if let Some(currency) = request.currency.as_deref().filter(|c| !c.is_empty()) {
            let listings = self.listings().await?;
            let resolved = resolve_symbol(&listings, currency)?;
            info!("[legacy] resolved {} to id {resolved}", currency.to_uppercase());
            id = Some(resolved);
        }

        if request.limit.is_some_and(Limit::is_all) {
            return self.ticker_all(request.structure, convert.as_deref()).await;
        }

        let mut query = Query::new();
        query.insert_opt("start", request.start.filter(|s| *s != 0));
        query.insert_opt("convert", convert);
        query.insert_opt("limit", request.limit.and_then(Limit::count));
        query.insert_opt("structure", request.structure.map(Structure::as_str));
        query.insert_opt("sort", request.sort.as_deref());

        let segment = id.map(|id| id.to_string());
        self.dispatcher
            .get(TICKER_PATH, segment.as_deref(), &query)
            .await
    }

    /// Page through the whole ranking in windows of [`LEGACY_WINDOW_SIZE`].
    async fn ticker_all(&self, structure: Option<Structure>, convert: Option<&str>) -> Result<Value> {
        let total = self.total_active_cryptocurrencies().await?;
        let merger = Merger::new(
            structure.unwrap_or_default(),
            ApiFlavor::Legacy.metadata_key(),
        );

        let dispatcher = &self.dispatcher;
        let merged = merger
            .fetch_all(total, LEGACY_WINDOW_SIZE, |window| {
                let query = ticker_page_query(window, structure, convert);
                async move { dispatcher.get(TICKER_PATH, None, &query).await }
            })
            .await?;
        Ok(merged.into_value())
    }
}

/// Query for one fetch-all window. The API pages by 100, so no `limit`.
fn ticker_page_query(window: RankWindow, structure: Option<Structure>, convert: Option<&str>) -> Query {
    let mut query = Query::new();
    query.insert("start", window.start.to_string());
    query.insert_opt("structure", structure.map(Structure::as_str));
    query.insert_opt("convert", convert);
    query
}

#[cfg(test)]
mod tests {
    use cmc_core::CmcError;
    use serde_json::json;

    use super::*;
    use crate::dispatch::API_KEY_HEADER;
    use crate::testing::{StubTransport, path_of, query_param};

    const TOTAL: u32 = 250;

    /// Routes the public API paths to canned bodies.
    fn api(url: &str) -> Result<Value> {
        match path_of(url) {
            "http://stub/v2/listings" => Ok(json!({
                "data": [
                    { "id": 1, "name": "Bitcoin", "symbol": "BTC", "website_slug": "bitcoin" },
                    { "id": 1027, "name": "Ethereum", "symbol": "ETH", "website_slug": "ethereum" }
                ],
                "metadata": { "num_cryptocurrencies": 2 }
            })),
            "http://stub/v2/global" => Ok(json!({
                "data": { "active_cryptocurrencies": TOTAL },
                "metadata": { "error": null }
            })),
            "http://stub/v2/ticker" => {
                let start: u32 = query_param(url, "start")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1);
                let end = (start + LEGACY_WINDOW_SIZE - 1).min(TOTAL);
                let rows: Vec<Value> = (start..=end)
                    .map(|rank| json!({ "id": rank + 1000, "rank": rank }))
                    .collect();
                let data = if query_param(url, "structure").as_deref() == Some("array") {
                    Value::Array(rows)
                } else {
                    Value::Object(
                        rows.into_iter()
                            .map(|r| (r["id"].to_string(), r))
                            .collect(),
                    )
                };
                Ok(json!({ "data": data, "metadata": { "start": start } }))
            }
            "http://stub/v2/ticker/1027" => Ok(json!({ "data": { "id": 1027, "symbol": "ETH" } })),
            other => Err(CmcError::transport(format!("unexpected url {other}"))),
        }
    }

    fn client() -> (LegacyClient, Arc<StubTransport>) {
        let transport = Arc::new(StubTransport::new(api));
        let config = ClientConfig::new(ApiFlavor::Pro).with_base_url("http://stub");
        (LegacyClient::with_transport(&config, transport.clone()), transport)
    }

    #[tokio::test]
    async fn listings_and_global() {
        let (client, transport) = client();
        let listings = client.listings().await.unwrap();
        assert_eq!(listings["data"].as_array().unwrap().len(), 2);

        client.global(&GlobalRequest::convert("gbp")).await.unwrap();
        assert_eq!(client.total_active_cryptocurrencies().await.unwrap(), TOTAL);

        assert_eq!(
            transport.urls(),
            vec![
                "http://stub/v2/listings",
                "http://stub/v2/global?convert=GBP",
                "http://stub/v2/global",
            ]
        );
    }

    #[tokio::test]
    async fn ticker_page_query_is_ordered_and_sparse() {
        let (client, transport) = client();
        let request = TickerRequest {
            start: Some(5),
            limit: Some(Limit::from(10)),
            convert: Some(OneOrMany::from(["usd", "eur"])),
            ..Default::default()
        };
        client.ticker(&request).await.unwrap();
        client.ticker(&request).await.unwrap();

        let urls = transport.urls();
        assert_eq!(urls[0], "http://stub/v2/ticker?start=5&convert=USD,EUR&limit=10");
        assert_eq!(urls[0], urls[1]);
    }

    #[tokio::test]
    async fn currency_is_resolved_to_id_segment() {
        let (client, transport) = client();
        let ticker = client
            .ticker(&TickerRequest {
                currency: Some("eth".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ticker["data"]["symbol"], "ETH");
        assert_eq!(
            transport.urls(),
            vec!["http://stub/v2/listings", "http://stub/v2/ticker/1027"]
        );
    }

    #[tokio::test]
    async fn unknown_currency_is_not_found() {
        let (client, transport) = client();
        let err = client
            .ticker(&TickerRequest {
                currency: Some("NOPE".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CmcError::NotFound(_)));
        assert_eq!(transport.urls(), vec!["http://stub/v2/listings"]);
    }

    #[tokio::test]
    async fn configured_api_key_is_not_sent() {
        let transport = Arc::new(StubTransport::new(api));
        let config = ClientConfig::new(ApiFlavor::Pro)
            .with_api_key("secret")
            .with_base_url("http://stub");
        let client = LegacyClient::with_transport(&config, transport.clone());

        client.listings().await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].headers.get(API_KEY_HEADER).is_none());
        assert_eq!(calls[0].headers.get("Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn invalid_options_never_reach_the_network() {
        let (client, transport) = client();
        let err = client
            .ticker(&TickerRequest {
                currency: Some("BTC".into()),
                id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CmcError::ConflictingSelector(_)));

        let err = client
            .ticker(&TickerRequest {
                start: Some(1),
                limit: Some(Limit::All),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CmcError::IncompatibleOptions(_)));

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_all_as_array() {
        let (client, transport) = client();
        let body = client
            .ticker(&TickerRequest {
                limit: Some(Limit::All),
                structure: Some(Structure::Array),
                convert: Some(OneOrMany::from("eur")),
                ..Default::default()
            })
            .await
            .unwrap();

        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 250);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[249]["rank"], 250);
        assert_eq!(body["metadata"]["start"], 201);

        let mut page_urls: Vec<String> = transport
            .urls()
            .into_iter()
            .filter(|u| path_of(u) == "http://stub/v2/ticker")
            .collect();
        page_urls.sort();
        assert_eq!(
            page_urls,
            vec![
                "http://stub/v2/ticker?start=1&structure=array&convert=EUR",
                "http://stub/v2/ticker?start=101&structure=array&convert=EUR",
                "http://stub/v2/ticker?start=201&structure=array&convert=EUR",
            ]
        );
    }

    #[tokio::test]
    async fn fetch_all_as_map() {
        let (client, _) = client();
        let body = client
            .ticker(&TickerRequest {
                limit: Some(Limit::All),
                ..Default::default()
            })
            .await
            .unwrap();
        let map = body["data"].as_object().unwrap();
        assert_eq!(map.len(), 250);
        assert_eq!(map["1001"]["rank"], 1);
    }

    #[tokio::test]
    async fn failed_total_lookup_issues_no_pages() {
        let transport = Arc::new(StubTransport::new(|url| {
            if path_of(url).ends_with("/global") {
                Err(CmcError::transport("global down"))
            } else {
                Ok(json!({ "data": [] }))
            }
        }));
        let config = ClientConfig::new(ApiFlavor::Legacy).with_base_url("http://stub");
        let client = LegacyClient::with_transport(&config, transport.clone());

        let err = client
            .ticker(&TickerRequest {
                limit: Some(Limit::All),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, CmcError::transport("global down"));
        assert_eq!(transport.urls(), vec!["http://stub/v2/global"]);
    }
}
