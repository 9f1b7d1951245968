use std::sync::Arc;

use cmc_client::legacy::GlobalRequest;
use cmc_client::{
    CmcError, HttpTransport, LegacyClient, Limit, ProClient, QuotesRequest, Structure,
    TickerRequest,
};
use cmc_core::ApiFlavor;
use cmc_core::config::ClientConfig;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ticker_page(start: u32, end: u32) -> serde_json::Value {
    let rows: Vec<_> = (start..=end)
        .map(|rank| json!({ "id": rank, "rank": rank, "symbol": format!("C{rank}") }))
        .collect();
    json!({ "data": rows, "metadata": { "start": start } })
}

#[tokio::test]
async fn pro_quotes_send_key_and_joined_symbols() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/cryptocurrency/quotes/latest"))
        .and(header("X-CMC_PRO_API_KEY", "test-key"))
        .and(header("Accept", "application/json"))
        .and(query_param("symbol", "BTC,ETH"))
        .and(query_param("convert", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": { "error_code": 0 },
            "data": {
                "BTC": { "id": 1, "quote": { "EUR": { "price": 50000.0 } } },
                "ETH": { "id": 1027, "quote": { "EUR": { "price": 3000.0 } } }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(ApiFlavor::Pro)
        .with_api_key("test-key")
        .with_base_url(mock_server.uri());
    let client = ProClient::with_transport(&config, Arc::new(HttpTransport::new())).unwrap();

    let body = client
        .quotes(&QuotesRequest::symbols(["BTC", "ETH"]).with_convert("eur"))
        .await
        .unwrap();
    assert_eq!(body["data"]["ETH"]["id"], 1027);
}

#[tokio::test]
async fn error_status_body_is_returned_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/global-metrics/quotes/latest"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": { "error_code": 1002, "error_message": "API key missing." }
        })))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(ApiFlavor::Pro)
        .with_api_key("bad")
        .with_base_url(mock_server.uri());
    let client = ProClient::new(&config).unwrap();

    let body = client.global(&Default::default()).await.unwrap();
    assert_eq!(body["status"]["error_code"], 1002);
}

#[tokio::test]
async fn legacy_fetch_all_pages_by_hundred() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "active_cryptocurrencies": 250 },
            "metadata": { "error": null }
        })))
        .mount(&mock_server)
        .await;

    for (start, end) in [(1, 100), (101, 200), (201, 250)] {
        Mock::given(method("GET"))
            .and(path("/v2/ticker"))
            .and(query_param("start", start.to_string()))
            .and(query_param("structure", "array"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ticker_page(start, end)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = ClientConfig::new(ApiFlavor::Legacy).with_base_url(mock_server.uri());
    let client = LegacyClient::new(&config).unwrap();

    let body = client
        .ticker(&TickerRequest {
            limit: Some(Limit::All),
            structure: Some(Structure::Array),
            ..Default::default()
        })
        .await
        .unwrap();

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 250);
    assert_eq!(rows[100]["rank"], 101);
    assert_eq!(body["metadata"]["start"], 201);
}

#[tokio::test]
async fn legacy_global_upper_cases_convert() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/global"))
        .and(query_param("convert", "GBP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "active_cryptocurrencies": 1600 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(ApiFlavor::Legacy).with_base_url(mock_server.uri());
    let client = LegacyClient::new(&config).unwrap();
    let body = client.global(&GlobalRequest::convert("gbp")).await.unwrap();
    assert_eq!(body["data"]["active_cryptocurrencies"], 1600);
}

#[tokio::test]
async fn non_json_body_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/listings"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(ApiFlavor::Legacy).with_base_url(mock_server.uri());
    let client = LegacyClient::new(&config).unwrap();

    let err = client.listings().await.unwrap_err();
    assert!(matches!(err, CmcError::Transport(_)));
    assert!(!err.is_validation());
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let config = ClientConfig::new(ApiFlavor::Legacy).with_base_url("http://127.0.0.1:9");
    let client = LegacyClient::new(&config).unwrap();

    let err = client.listings().await.unwrap_err();
    assert!(matches!(err, CmcError::Transport(_)));
}
