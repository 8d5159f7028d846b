use chrono::{DateTime, Utc};

use crate::sinks::SinkError;

/// One resting (price, size) pair, kept in the exchange's original string
/// form until aggregation so we never lose precision before we have to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: String,
    pub size: String,
}

impl PriceLevel {
    pub fn new(price: impl Into<String>, size: impl Into<String>) -> Self {
        Self { price: price.into(), size: size.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    // Wire form used in the CSV `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

/// A fetched book, after extraction but before any sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct BookSnapshot {
    pub exchange: String,
    pub market: String,
    pub timestamp: DateTime<Utc>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// One accepted book entry, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub exchange: String,
    pub time: String,
    pub market: String,
    pub side: Side,
    pub price: String,
    pub size: String,
}

/// Output of the volume-capped walk over both sides.
///
/// `bid_notional`/`ask_notional` are the running price*size sums at the point
/// each side stopped; they may exceed the cap by up to one level's notional
/// because the cap is checked before a level is added, not after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    pub bid_rows: Vec<Row>,
    pub ask_rows: Vec<Row>,
    pub bid_count: usize,
    pub ask_count: usize,
    pub total_bid_price: f64,
    pub total_ask_price: f64,
    pub bid_notional: f64,
    pub ask_notional: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unsupported exchange: {0}")]
    UnsupportedExchange(String),
    #[error("no pair code mapping for market {market} on {exchange}")]
    UnknownMarketMapping { exchange: &'static str, market: String },
    #[error("malformed order book level: {0}")]
    MalformedLevel(String),
    #[error("invalid price or size: {0:?}")]
    InvalidPrice(String),
    #[error("no liquidity on at least one side (bids accepted: {bid_count}, asks accepted: {ask_count})")]
    NoLiquidity { bid_count: usize, ask_count: usize },
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] SinkError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
