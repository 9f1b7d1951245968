//! Option-combination rules and symbol resolution.
//!
//! All checks here run before any request is dispatched. A failure means the
//! caller passed an impossible combination; none of these errors are
//! recoverable by retrying.

use cmc_core::{CmcError, Limit, Result};
use serde_json::Value;

use crate::legacy::TickerRequest;

/// Reject a start offset combined with [`Limit::All`].
///
/// Fetch-all always pages from rank 1, so a partial offset is contradictory.
pub fn check_fetch_all_offset(start: Option<u32>, limit: Option<Limit>) -> Result<()> {
    let has_start = start.is_some_and(|s| s != 0);
    if has_start && limit.is_some_and(Limit::is_all) {
        return Err(CmcError::IncompatibleOptions(
            "start and limit = 0 cannot be passed in at the same time".into(),
        ));
    }
    Ok(())
}

/// Rules for the public single/multi ticker endpoint.
///
/// Checked in order:
/// 1. a single-asset selector (`currency` or `id`) excludes the
///    listing-window options (`start`, `limit`, `sort`)
/// 2. `currency` and `id` exclude each other
/// 3. a start offset excludes [`Limit::All`]
pub fn validate_ticker(request: &TickerRequest) -> Result<()> {
    let has_currency = request.currency.as_deref().is_some_and(|c| !c.is_empty());
    let has_id = request.id.is_some();
    let has_window = request.start.is_some_and(|s| s != 0)
        || request.limit.is_some()
        || request.sort.as_deref().is_some_and(|s| !s.is_empty());

    if (has_currency || has_id) && has_window {
        return Err(CmcError::IncompatibleOptions(
            "start, limit, and sort options can only be used when currency or id is not given"
                .into(),
        ));
    }
    if has_currency && has_id {
        return Err(CmcError::ConflictingSelector(
            "currency and id cannot be passed in at the same time".into(),
        ));
    }
    check_fetch_all_offset(request.start, request.limit)
}

/// Resolve a ticker symbol to its numeric id using a `/listings` snapshot.
///
/// Matching ignores ASCII case. The first listing wins when a symbol is
/// shared by several assets.
pub fn resolve_symbol(listings: &Value, symbol: &str) -> Result<u64> {
    let rows = listings
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| CmcError::transport("listings snapshot has no data array"))?;

    rows.iter()
        .find(|row| {
            row.get("symbol")
                .and_then(Value::as_str)
                .is_some_and(|s| s.eq_ignore_ascii_case(symbol))
        })
        .and_then(|row| row.get("id").and_then(Value::as_u64))
        .ok_or_else(|| CmcError::NotFound(format!("no listing with symbol {symbol}")))
}

#[cfg(test)]
mod tests {
    use cmc_core::OneOrMany;
    use serde_json::json;

    use super::*;

    fn request() -> TickerRequest {
        TickerRequest::default()
    }

    #[test]
    fn currency_with_id_conflicts() {
        let req = TickerRequest {
            currency: Some("BTC".into()),
            id: Some(1),
            ..request()
        };
        assert!(matches!(
            validate_ticker(&req),
            Err(CmcError::ConflictingSelector(_))
        ));
    }

    #[test]
    fn window_with_single_asset_is_incompatible() {
        let req = TickerRequest {
            start: Some(1),
            currency: Some("ETH".into()),
            ..request()
        };
        assert!(matches!(
            validate_ticker(&req),
            Err(CmcError::IncompatibleOptions(_))
        ));

        let req = TickerRequest {
            sort: Some("rank".into()),
            id: Some(2),
            ..request()
        };
        assert!(matches!(
            validate_ticker(&req),
            Err(CmcError::IncompatibleOptions(_))
        ));
    }

    #[test]
    fn start_with_fetch_all_is_incompatible() {
        let req = TickerRequest {
            start: Some(1),
            limit: Some(Limit::All),
            ..request()
        };
        assert!(matches!(
            validate_ticker(&req),
            Err(CmcError::IncompatibleOptions(_))
        ));
        assert!(check_fetch_all_offset(Some(0), Some(Limit::All)).is_ok());
        assert!(check_fetch_all_offset(None, Some(Limit::All)).is_ok());
    }

    #[test]
    fn accepts_plain_combinations() {
        let cases = [
            TickerRequest {
                limit: Some(Limit::from(10)),
                ..request()
            },
            TickerRequest {
                convert: Some(OneOrMany::from("EUR")),
                ..request()
            },
            TickerRequest {
                currency: Some("BTC".into()),
                ..request()
            },
            TickerRequest {
                id: Some(2),
                convert: Some(OneOrMany::from("JPY")),
                ..request()
            },
            TickerRequest {
                start: Some(0),
                limit: Some(Limit::from(5)),
                ..request()
            },
            request(),
        ];
        for req in &cases {
            assert!(validate_ticker(req).is_ok(), "{req:?}");
        }
    }

    #[test]
    fn resolves_symbol_case_insensitively() {
        let listings = json!({
            "data": [
                { "id": 1, "symbol": "BTC", "name": "Bitcoin" },
                { "id": 1027, "symbol": "ETH", "name": "Ethereum" }
            ]
        });
        assert_eq!(resolve_symbol(&listings, "eth").unwrap(), 1027);
        assert_eq!(resolve_symbol(&listings, "BTC").unwrap(), 1);
        assert!(matches!(
            resolve_symbol(&listings, "DOGE"),
            Err(CmcError::NotFound(_))
        ));
        assert!(matches!(
            resolve_symbol(&json!({ "error": "x" }), "BTC"),
            Err(CmcError::Transport(_))
        ));
    }
}
