use crate::market_data::types::{AggregationResult, PipelineError, PipelineResult};

/// Mid-price over the accepted rows: the average of the per-side average
/// prices. Deliberately not volume-weighted; this mirrors the upstream
/// definition of the metric.
pub fn mid_price(result: &AggregationResult) -> PipelineResult<f64> {
    if result.bid_count == 0 || result.ask_count == 0 {
        return Err(PipelineError::NoLiquidity {
            bid_count: result.bid_count,
            ask_count: result.ask_count,
        });
    }
    let avg_bid = result.total_bid_price / result.bid_count as f64;
    let avg_ask = result.total_ask_price / result.ask_count as f64;
    Ok((avg_bid + avg_ask) / 2.0)
}
