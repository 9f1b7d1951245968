//! # cmc
//!
//! Command-line front end for the CoinMarketCap clients.
//!
//! Loads an optional JSON configuration file, applies flag overrides, runs a
//! single API operation and prints the JSON response on stdout. Logs go to
//! stderr (and to a daily file when `--log-dir` is set).
//!
//! # Usage
//!
//! ```bash
//! cmc ticker --limit 0 --structure array
//! CMC_API_KEY=... cmc quotes --symbol BTC,ETH --convert EUR
//! cmc --config cmc.json tickers --limit 0
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cmc_client::{LegacyClient, ProClient, legacy, pro};
use cmc_core::config::{AppConfig, ClientConfig, LogConfig, load_config};
use cmc_core::{CryptocurrencyType, Limit, ListingStatus, OneOrMany, SortDir, Structure};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

/// CoinMarketCap API client.
#[derive(Parser)]
#[command(name = "cmc", about = "CoinMarketCap API client")]
struct Cli {
    /// Configuration file path (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pro API key (overrides the config file).
    #[arg(long, env = "CMC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL override (overrides the config file).
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Public API: all active listings.
    Listings,

    /// Public API: ticker data for a page, one asset, or everything.
    Ticker {
        /// First rank to return.
        #[arg(long)]
        start: Option<u32>,
        /// Result count; 0 fetches every active cryptocurrency.
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        sort: Option<String>,
        /// `dictionary` or `array`.
        #[arg(long, value_parser = parse_enum::<Structure>)]
        structure: Option<Structure>,
        #[arg(long, value_delimiter = ',')]
        convert: Vec<String>,
        /// Ticker symbol, resolved to an id.
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        id: Option<u64>,
    },

    /// Public API: global market snapshot.
    Global {
        #[arg(long, value_delimiter = ',')]
        convert: Vec<String>,
    },

    /// Pro API: symbol to id map.
    IdMap {
        /// `active` or `inactive`.
        #[arg(long, value_parser = parse_enum::<ListingStatus>)]
        listing_status: Option<ListingStatus>,
        #[arg(long)]
        start: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        symbol: Vec<String>,
        #[arg(long)]
        sort: Option<String>,
    },

    /// Pro API: static metadata for assets.
    Metadata {
        #[arg(long, value_delimiter = ',')]
        id: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        symbol: Vec<String>,
    },

    /// Pro API: latest listings; `--limit 0` fetches all of them.
    Tickers {
        #[arg(long)]
        start: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        convert: Vec<String>,
        #[arg(long)]
        sort: Option<String>,
        /// `asc` or `desc`.
        #[arg(long, value_parser = parse_enum::<SortDir>)]
        sort_dir: Option<SortDir>,
        /// `all`, `coins` or `tokens`.
        #[arg(long, value_parser = parse_enum::<CryptocurrencyType>)]
        cryptocurrency_type: Option<CryptocurrencyType>,
    },

    /// Pro API: latest quotes for assets.
    Quotes {
        #[arg(long, value_delimiter = ',')]
        id: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        symbol: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        convert: Vec<String>,
    },

    /// Pro API: global market metrics.
    GlobalMetrics {
        #[arg(long, value_delimiter = ',')]
        convert: Vec<String>,
    },
}

/// Parse a lowercase option value through its serde representation.
fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(s.to_ascii_lowercase()))
        .map_err(|_| format!("unsupported value '{s}'"))
}

/// `None` for an empty list so the option is left out of the query.
fn list(values: Vec<String>) -> Option<OneOrMany> {
    (!values.is_empty()).then(|| OneOrMany::from(values))
}

fn client_config(cli: &Cli, config: &AppConfig) -> ClientConfig {
    let mut client = config.client.clone();
    if let Some(key) = &cli.api_key {
        client.api_key = Some(key.clone());
    }
    if let Some(url) = &cli.base_url {
        client.base_url = Some(url.clone());
    }
    client
}

async fn run(command: Command, config: &ClientConfig) -> Result<Value> {
    let value = match command {
        Command::Listings => LegacyClient::new(config)?.listings().await?,
        Command::Ticker {
            start,
            limit,
            sort,
            structure,
            convert,
            currency,
            id,
        } => {
            let request = legacy::TickerRequest {
                start,
                limit: limit.map(Limit::from),
                sort,
                structure,
                convert: list(convert),
                currency,
                id,
            };
            LegacyClient::new(config)?.ticker(&request).await?
        }
        Command::Global { convert } => {
            let request = legacy::GlobalRequest {
                convert: list(convert),
            };
            LegacyClient::new(config)?.global(&request).await?
        }
        Command::IdMap {
            listing_status,
            start,
            limit,
            symbol,
            sort,
        } => {
            let request = pro::IdMapRequest {
                listing_status,
                start,
                limit: limit.map(Limit::from),
                symbol: list(symbol),
                sort,
            };
            ProClient::new(config)?.id_map(&request).await?
        }
        Command::Metadata { id, symbol } => {
            let request = pro::MetadataRequest {
                id: list(id),
                symbol: list(symbol),
            };
            ProClient::new(config)?.metadata(&request).await?
        }
        Command::Tickers {
            start,
            limit,
            convert,
            sort,
            sort_dir,
            cryptocurrency_type,
        } => {
            let request = pro::TickersRequest {
                start,
                limit: limit.map(Limit::from),
                convert: list(convert),
                sort,
                sort_dir,
                cryptocurrency_type,
            };
            ProClient::new(config)?.tickers(&request).await?
        }
        Command::Quotes { id, symbol, convert } => {
            let request = pro::QuotesRequest {
                id: list(id),
                symbol: list(symbol),
                convert: list(convert),
            };
            ProClient::new(config)?.quotes(&request).await?
        }
        Command::GlobalMetrics { convert } => {
            let request = pro::GlobalRequest {
                convert: list(convert),
            };
            ProClient::new(config)?.global(&request).await?
        }
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let app_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    // 2. Initialize logging (flags win over the config file)
    let logging = LogConfig {
        level: cli.log_level.clone().or_else(|| app_config.logging.level.clone()),
        dir: cli.log_dir.clone().or_else(|| app_config.logging.dir.clone()),
    };
    cmc_core::logging::init_from_config(&logging, "cmc");

    let config = client_config(&cli, &app_config);
    debug!("client config: api={}, base_url={}", config.api, config.effective_base_url());

    // 3. Run the operation
    let value = run(cli.command, &config).await?;

    // 4. Print the result
    let pretty = serde_json::to_string_pretty(&value).context("failed to render response")?;
    println!("{pretty}");

    info!("done");
    Ok(())
}
