// Kraken Depth endpoint: bids/asks live under result.<pair code>, each level
// shaped like ["price", "volume", timestamp].
//
// The pair codes do not derive mechanically from the ticker passed to the
// endpoint, so they are an explicit table rather than string surgery.

use serde_json::Value;

use super::levels_from_array;
use crate::market_data::types::{PipelineError, PipelineResult, PriceLevel};

/// Kraken-internal pair code for a normalized ticker.
pub fn pair_code(market: &str) -> Option<&'static str> {
    match market {
        "BTC" => Some("XXBTZUSD"),
        "ETH" => Some("XETHZUSD"),
        _ => None,
    }
}

pub fn extract(market: &str, raw: &Value) -> PipelineResult<(Vec<PriceLevel>, Vec<PriceLevel>)> {
    let code = pair_code(market).ok_or_else(|| PipelineError::UnknownMarketMapping {
        exchange: "Kraken",
        market: market.to_string(),
    })?;

    let book = raw
        .get("result")
        .and_then(|r| r.get(code))
        .ok_or_else(|| {
            PipelineError::UpstreamFetch(format!("Kraken body missing `result.{code}`"))
        })?;

    let bids = book
        .get("bids")
        .ok_or_else(|| PipelineError::UpstreamFetch("Kraken book missing `bids`".into()))?;
    let asks = book
        .get("asks")
        .ok_or_else(|| PipelineError::UpstreamFetch("Kraken book missing `asks`".into()))?;
    Ok((levels_from_array(bids)?, levels_from_array(asks)?))
}
