// Serialization of accepted rows and the mid-price metric point.
//
// The CSV form is a plain comma join with no quoting or escaping; a field
// containing the delimiter would corrupt its row. Downstream consumers rely
// on this exact wire format, so no escaping is added here.

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::market_data::types::Row;
use crate::sinks::{Dimension, MetricRecord};

pub const CSV_HEADER: &str = "exchange,time,market,type,price,size";

/// Row timestamps and object keys share this rendering of the fetch time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Comma-joined fields, newline-joined rows; header only when asked for.
pub fn to_csv(rows: &[Row], include_header: bool) -> String {
    let body = rows
        .iter()
        .map(|row| {
            format!(
                "{},{},{},{},{},{}",
                row.exchange,
                row.time,
                row.market,
                row.side.as_str(),
                row.price,
                row.size
            )
        })
        .join("\n");

    if include_header {
        if body.is_empty() {
            CSV_HEADER.to_string()
        } else {
            format!("{CSV_HEADER}\n{body}")
        }
    } else {
        body
    }
}

/// Destination key for the CSV object.
pub fn object_key(prefix: &str, exchange: &str, market: &str, time: &str) -> String {
    format!("{prefix}/{exchange}/{market}/{exchange}_{market}_{time}_.csv")
}

/// One dimensioned mid-price point. The timestamp is the wall clock at build
/// time, not the snapshot's fetch time.
pub fn metric_record(exchange: &str, market: &str, mid_price: f64, now_millis: i64) -> MetricRecord {
    MetricRecord {
        dimensions: vec![
            Dimension { name: "Exchange".into(), value: exchange.into() },
            Dimension { name: "Market".into(), value: market.into() },
        ],
        measure_name: "mid_price".into(),
        measure_value: mid_price.to_string(),
        measure_value_type: "DOUBLE".into(),
        time: now_millis.to_string(),
    }
}
