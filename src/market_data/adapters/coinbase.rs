// Coinbase Pro book endpoint: bids/asks live at the top level of the body,
// each level shaped like ["price", "size", num_orders].

use serde_json::Value;

use super::levels_from_array;
use crate::market_data::types::{PipelineError, PipelineResult, PriceLevel};

pub fn extract(raw: &Value) -> PipelineResult<(Vec<PriceLevel>, Vec<PriceLevel>)> {
    let bids = raw
        .get("bids")
        .ok_or_else(|| PipelineError::UpstreamFetch("Coinbase body missing `bids`".into()))?;
    let asks = raw
        .get("asks")
        .ok_or_else(|| PipelineError::UpstreamFetch("Coinbase body missing `asks`".into()))?;
    Ok((levels_from_array(bids)?, levels_from_array(asks)?))
}
