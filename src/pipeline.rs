// One invocation = one sequential pass: fetch -> extract -> normalise ->
// aggregate -> mid-price -> format -> publish. No internal concurrency and
// no state carried between invocations.
//
// The two sink writes are not atomic with respect to each other: if the
// metric write fails after the object write succeeded, the partial result
// stays visible and the error is surfaced as-is.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::market_data::adapters::{fetch_book, Exchange};
use crate::market_data::aggregator::aggregate;
use crate::market_data::formatter::{format_timestamp, metric_record, object_key, to_csv};
use crate::market_data::normaliser::normalise;
use crate::market_data::summary::mid_price;
use crate::market_data::types::{BookSnapshot, PipelineResult, Row};
use crate::sinks::{MetricStore, ObjectStore};

/// One invocation record, as parsed from the CLI or a JSON event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    pub exchange: String,
    pub level: u32,
    pub market: String,
    pub bucket_name: String,
    pub bucket_prefix: String,
    pub max_amount_sum: f64,
    /// 0 or 1; anything but 1 means no header row.
    pub write_csv_headers: u8,
}

/// Where metric records land in the time-series store.
#[derive(Debug, Clone)]
pub struct MetricTarget {
    pub database: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub success: bool,
    pub message: String,
    pub object_key: String,
    pub mid_price: f64,
    pub rows_written: usize,
}

pub struct Pipeline {
    http: Client,
    object_store: Box<dyn ObjectStore>,
    metric_store: Box<dyn MetricStore>,
    metric_target: MetricTarget,
}

impl Pipeline {
    pub fn new(
        http: Client,
        object_store: Box<dyn ObjectStore>,
        metric_store: Box<dyn MetricStore>,
        metric_target: MetricTarget,
    ) -> Self {
        Self { http, object_store, metric_store, metric_target }
    }

    /// Fetch the book from the venue and run the rest of the pipeline on it.
    #[instrument(skip(self), fields(exchange = %invocation.exchange, market = %invocation.market))]
    pub async fn run(&self, invocation: &Invocation) -> PipelineResult<PipelineOutcome> {
        let exchange = Exchange::parse(&invocation.exchange)?;
        let raw = fetch_book(&self.http, exchange, &invocation.market, invocation.level).await?;
        self.process(invocation, exchange, &raw).await
    }

    /// Everything after the fetch, on an already-parsed response body.
    pub async fn process(
        &self,
        invocation: &Invocation,
        exchange: Exchange,
        raw: &serde_json::Value,
    ) -> PipelineResult<PipelineOutcome> {
        let timestamp = Utc::now();

        let (bids, asks) = exchange.extract_levels(&invocation.market, raw)?;
        let (bids, asks) = normalise(bids, asks)?;
        let snapshot = BookSnapshot {
            exchange: exchange.name().to_string(),
            market: invocation.market.clone(),
            timestamp,
            bids,
            asks,
        };

        let result = aggregate(&snapshot, invocation.max_amount_sum)?;
        let mid = mid_price(&result)?;

        let mut rows: Vec<Row> = result.bid_rows;
        rows.extend(result.ask_rows);
        let csv = to_csv(&rows, invocation.write_csv_headers == 1);

        let time = format_timestamp(timestamp);
        let key = object_key(
            &invocation.bucket_prefix,
            exchange.name(),
            &invocation.market,
            &time,
        );
        self.object_store
            .put(&invocation.bucket_name, &key, csv.as_bytes())
            .await?;

        let record = metric_record(
            exchange.name(),
            &invocation.market,
            mid,
            Utc::now().timestamp_millis(),
        );
        self.metric_store
            .write_records(&self.metric_target.database, &self.metric_target.table, &[record])
            .await?;

        metrics::gauge!(
            "booksnap_mid_price",
            "exchange" => exchange.name(),
            "market" => invocation.market.clone(),
        )
        .set(mid);
        metrics::counter!("booksnap_rows_written").increment(rows.len() as u64);

        let message = format!(
            "ingested {} rows to {}/{} and 1 metric record to {}.{}",
            rows.len(),
            invocation.bucket_name,
            key,
            self.metric_target.database,
            self.metric_target.table,
        );
        info!(rows = rows.len(), mid_price = mid, key = %key, "invocation complete");

        Ok(PipelineOutcome {
            success: true,
            message,
            object_key: key,
            mid_price: mid,
            rows_written: rows.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::types::PipelineError;
    use crate::sinks::mem::{FailingMetricStore, MemMetricStore, MemObjectStore};
    use serde_json::json;
    use std::sync::Arc;

    fn invocation(cap: f64, headers: u8) -> Invocation {
        Invocation {
            exchange: "Coinbase".into(),
            level: 2,
            market: "BTC".into(),
            bucket_name: "books".into(),
            bucket_prefix: "snapshots".into(),
            max_amount_sum: cap,
            write_csv_headers: headers,
        }
    }

    fn coinbase_raw() -> serde_json::Value {
        json!({
            "bids": [["100", "2", 1], ["101", "1", 1]],
            "asks": [["102", "3", 1]],
        })
    }

    struct Harness {
        pipeline: Pipeline,
        objects: Arc<MemObjectStore>,
        metrics: Arc<MemMetricStore>,
    }

    fn harness() -> Harness {
        let objects = Arc::new(MemObjectStore::default());
        let metrics = Arc::new(MemMetricStore::default());
        let pipeline = Pipeline::new(
            Client::new(),
            Box::new(SharedObjectStore(objects.clone())),
            Box::new(SharedMetricStore(metrics.clone())),
            MetricTarget { database: "CrytoExchangeData".into(), table: "orderbookdata".into() },
        );
        Harness { pipeline, objects, metrics }
    }

    struct SharedObjectStore(Arc<MemObjectStore>);
    #[async_trait::async_trait]
    impl crate::sinks::ObjectStore for SharedObjectStore {
        async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> crate::sinks::SinkResult<()> {
            self.0.put(bucket, key, bytes).await
        }
    }

    struct SharedMetricStore(Arc<MemMetricStore>);
    #[async_trait::async_trait]
    impl crate::sinks::MetricStore for SharedMetricStore {
        async fn write_records(
            &self,
            database: &str,
            table: &str,
            records: &[crate::sinks::MetricRecord],
        ) -> crate::sinks::SinkResult<()> {
            self.0.write_records(database, table, records).await
        }
    }

    #[tokio::test]
    async fn full_invocation_publishes_to_both_sinks() {
        let h = harness();
        let outcome = h
            .pipeline
            .process(&invocation(1000.0, 0), Exchange::Coinbase, &coinbase_raw())
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.rows_written, 3);
        assert_eq!(outcome.mid_price, 101.25);

        let objects = h.objects.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        let (bucket, key, bytes) = &objects[0];
        assert_eq!(bucket, "books");
        assert!(key.starts_with("snapshots/Coinbase/BTC/Coinbase_BTC_"));
        assert!(key.ends_with("_.csv"));

        // bids sorted descending, then asks, no header
        let csv = String::from_utf8(bytes.clone()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(",bid,101,1"));
        assert!(lines[1].contains(",bid,100,2"));
        assert!(lines[2].contains(",ask,102,3"));

        let writes = h.metrics.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (database, table, records) = &writes[0];
        assert_eq!(database, "CrytoExchangeData");
        assert_eq!(table, "orderbookdata");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].measure_value, "101.25");
    }

    #[tokio::test]
    async fn header_row_is_prepended_when_asked() {
        let h = harness();
        h.pipeline
            .process(&invocation(1000.0, 1), Exchange::Coinbase, &coinbase_raw())
            .await
            .unwrap();

        let objects = h.objects.objects.lock().unwrap();
        let csv = String::from_utf8(objects[0].2.clone()).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert_eq!(csv.lines().next().unwrap(), "exchange,time,market,type,price,size");
    }

    #[tokio::test]
    async fn tight_cap_scenario() {
        let h = harness();
        let outcome = h
            .pipeline
            .process(&invocation(50.0, 0), Exchange::Coinbase, &coinbase_raw())
            .await
            .unwrap();
        assert_eq!(outcome.rows_written, 2);
        assert_eq!(outcome.mid_price, 101.5);
    }

    #[tokio::test]
    async fn zero_cap_fails_before_any_sink_write() {
        let h = harness();
        let err = h
            .pipeline
            .process(&invocation(0.0, 0), Exchange::Coinbase, &coinbase_raw())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoLiquidity { bid_count: 0, ask_count: 0 }));
        assert!(h.objects.objects.lock().unwrap().is_empty());
        assert!(h.metrics.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn metric_failure_leaves_object_write_visible() {
        let objects = Arc::new(MemObjectStore::default());
        let pipeline = Pipeline::new(
            Client::new(),
            Box::new(SharedObjectStore(objects.clone())),
            Box::new(FailingMetricStore),
            MetricTarget { database: "db".into(), table: "t".into() },
        );

        let err = pipeline
            .process(&invocation(1000.0, 0), Exchange::Coinbase, &coinbase_raw())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::SinkWrite(_)));
        // Partial completion is not rolled back.
        assert_eq!(objects.objects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn kraken_invocation_uses_pair_code_extraction() {
        let h = harness();
        let raw = json!({
            "error": [],
            "result": {
                "XETHZUSD": {
                    "bids": [["2000.1", "1.0", 1616663618]],
                    "asks": [["2000.5", "2.0", 1616663619]],
                }
            }
        });
        let mut inv = invocation(1_000_000.0, 0);
        inv.exchange = "Kraken".into();
        inv.market = "ETH".into();

        let outcome = h.pipeline.process(&inv, Exchange::Kraken, &raw).await.unwrap();
        assert_eq!(outcome.rows_written, 2);
        let objects = h.objects.objects.lock().unwrap();
        assert!(objects[0].1.starts_with("snapshots/Kraken/ETH/Kraken_ETH_"));
    }
}
