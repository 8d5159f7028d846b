// Defensive re-sort of venue book levels.
//
// Both venues document their feeds as pre-sorted, but the normaliser never
// assumes input order. Sorting is stable so equal-priced levels keep the
// venue's relative order.

use tracing::trace;

use crate::market_data::types::{PipelineError, PipelineResult, PriceLevel};

/// Sort bids descending and asks ascending by numeric price, keeping the
/// original string forms untouched.
pub fn normalise(
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
) -> PipelineResult<(Vec<PriceLevel>, Vec<PriceLevel>)> {
    let sorted_bids = sort_side(bids, true)?;
    let sorted_asks = sort_side(asks, false)?;
    trace!(bids = sorted_bids.len(), asks = sorted_asks.len(), "normalised book");
    Ok((sorted_bids, sorted_asks))
}

fn sort_side(levels: Vec<PriceLevel>, descending: bool) -> PipelineResult<Vec<PriceLevel>> {
    let mut keyed: Vec<(f64, PriceLevel)> = levels
        .into_iter()
        .map(|level| Ok((parse_decimal(&level.price)?, level)))
        .collect::<PipelineResult<_>>()?;

    // Vec::sort_by is stable; total_cmp is safe because parse_decimal
    // rejects non-finite values.
    if descending {
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    } else {
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    Ok(keyed.into_iter().map(|(_, level)| level).collect())
}

/// Parse a wire price/size field as a finite decimal.
pub(crate) fn parse_decimal(s: &str) -> PipelineResult<f64> {
    let value: f64 = s
        .parse()
        .map_err(|_| PipelineError::InvalidPrice(s.to_string()))?;
    if !value.is_finite() {
        return Err(PipelineError::InvalidPrice(s.to_string()));
    }
    Ok(value)
}
