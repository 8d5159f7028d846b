// Volume-capped walk over a sorted book.
//
// The cap is a stopping threshold, not a ceiling: each side is walked in
// order and a level is accepted when the notional accumulated *before* it is
// still below the cap. The final running sum may therefore overshoot the cap
// by up to one level's notional.

use tracing::debug;

use crate::market_data::formatter::format_timestamp;
use crate::market_data::normaliser::parse_decimal;
use crate::market_data::types::{
    AggregationResult, BookSnapshot, PipelineResult, PriceLevel, Row, Side,
};

/// Walk both sides of an already-normalised snapshot, accepting levels until
/// the running notional crosses `cap`. A cap <= 0 accepts nothing.
pub fn aggregate(snapshot: &BookSnapshot, cap: f64) -> PipelineResult<AggregationResult> {
    let time = format_timestamp(snapshot.timestamp);

    let (bid_rows, total_bid_price, bid_notional) =
        walk_side(snapshot, &time, Side::Bid, &snapshot.bids, cap)?;
    let (ask_rows, total_ask_price, ask_notional) =
        walk_side(snapshot, &time, Side::Ask, &snapshot.asks, cap)?;

    debug!(
        bid_count = bid_rows.len(),
        ask_count = ask_rows.len(),
        bid_notional,
        ask_notional,
        "aggregated book"
    );

    Ok(AggregationResult {
        bid_count: bid_rows.len(),
        ask_count: ask_rows.len(),
        bid_rows,
        ask_rows,
        total_bid_price,
        total_ask_price,
        bid_notional,
        ask_notional,
    })
}

fn walk_side(
    snapshot: &BookSnapshot,
    time: &str,
    side: Side,
    levels: &[PriceLevel],
    cap: f64,
) -> PipelineResult<(Vec<Row>, f64, f64)> {
    let mut rows = Vec::new();
    let mut notional = 0.0;
    let mut price_sum = 0.0;

    for level in levels {
        // Threshold check uses the sum as it stood before this level.
        if !(notional < cap) {
            break;
        }
        let price = parse_decimal(&level.price)?;
        let size = parse_decimal(&level.size)?;
        rows.push(Row {
            exchange: snapshot.exchange.clone(),
            time: time.to_string(),
            market: snapshot.market.clone(),
            side,
            price: level.price.clone(),
            size: level.size.clone(),
        });
        notional += price * size;
        price_sum += price;
    }

    Ok((rows, price_sum, notional))
}
