// Venue-specific symbol construction and book extraction.
// One variant per supported exchange; adding a venue means adding a variant
// and covering the exhaustive matches below.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::market_data::types::{PipelineError, PipelineResult, PriceLevel};

pub mod coinbase;
pub mod kraken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Coinbase,
    Kraken,
}

impl Exchange {
    pub fn parse(name: &str) -> PipelineResult<Self> {
        match name {
            "Coinbase" => Ok(Exchange::Coinbase),
            "Kraken" => Ok(Exchange::Kraken),
            other => Err(PipelineError::UnsupportedExchange(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Exchange::Coinbase => "Coinbase",
            Exchange::Kraken => "Kraken",
        }
    }

    /// Symbol sent to the venue's endpoint. The quote suffix is spelled
    /// differently per venue ("BTC-USD" vs "BTCUSD").
    pub fn market_symbol(&self, market: &str) -> String {
        match self {
            Exchange::Coinbase => format!("{market}-USD"),
            Exchange::Kraken => format!("{market}USD"),
        }
    }

    /// Book endpoint for one market. Kraken's Depth endpoint has no level
    /// parameter, so `level` only reaches Coinbase.
    pub fn book_url(&self, market: &str, level: u32) -> String {
        let symbol = self.market_symbol(market);
        match self {
            Exchange::Coinbase => {
                format!("https://api.pro.coinbase.com/products/{symbol}/book?level={level}")
            }
            Exchange::Kraken => {
                format!("https://api.kraken.com/0/public/Depth?pair={symbol}")
            }
        }
    }

    /// Pull the raw bid/ask lists out of a parsed response body, in whatever
    /// order the venue returned them. No sorting or numeric validation here.
    pub fn extract_levels(
        &self,
        market: &str,
        raw: &Value,
    ) -> PipelineResult<(Vec<PriceLevel>, Vec<PriceLevel>)> {
        match self {
            Exchange::Coinbase => coinbase::extract(raw),
            Exchange::Kraken => kraken::extract(market, raw),
        }
    }
}

impl std::str::FromStr for Exchange {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exchange::parse(s)
    }
}

/// GET the venue's book endpoint and parse the body as JSON.
#[instrument(skip(client))]
pub async fn fetch_book(
    client: &Client,
    exchange: Exchange,
    market: &str,
    level: u32,
) -> PipelineResult<Value> {
    let url = exchange.book_url(market, level);
    debug!(url = %url, "fetching order book");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| PipelineError::UpstreamFetch(format!("GET {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PipelineError::UpstreamFetch(format!(
            "GET {url}: HTTP {status}: {body}"
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| PipelineError::UpstreamFetch(format!("GET {url}: bad JSON body: {e}")))
}

/// Convert one raw level tuple into a PriceLevel. Tuples must carry at least
/// [price, size]; trailing fields (order counts, timestamps) are ignored.
pub(crate) fn level_from_tuple(tuple: &Value) -> PipelineResult<PriceLevel> {
    let fields = tuple
        .as_array()
        .ok_or_else(|| PipelineError::MalformedLevel(tuple.to_string()))?;
    if fields.len() < 2 {
        return Err(PipelineError::MalformedLevel(tuple.to_string()));
    }
    Ok(PriceLevel::new(
        scalar_string(&fields[0], tuple)?,
        scalar_string(&fields[1], tuple)?,
    ))
}

pub(crate) fn levels_from_array(raw: &Value) -> PipelineResult<Vec<PriceLevel>> {
    raw.as_array()
        .ok_or_else(|| PipelineError::MalformedLevel(raw.to_string()))?
        .iter()
        .map(level_from_tuple)
        .collect()
}

// Venues return prices/sizes as decimal strings, but some fields arrive as
// bare numbers; keep whichever textual form serde gives us.
fn scalar_string(v: &Value, context: &Value) -> PipelineResult<String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(PipelineError::MalformedLevel(context.to_string())),
    }
}
