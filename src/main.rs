use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use reqwest::Client;

use booksnap_rs::pipeline::{Invocation, MetricTarget, Pipeline};
use booksnap_rs::sinks::fs::FsObjectStore;
use booksnap_rs::sinks::http::{HttpMetricStore, HttpObjectStore};
use booksnap_rs::sinks::log::LogMetricStore;
use booksnap_rs::sinks::{MetricStore, ObjectStore};
use booksnap_rs::telemetry;

/// Fetch one order-book snapshot, publish CSV rows to the object store and
/// the mid-price to the metric store.
#[derive(Parser, Debug)]
#[command(name = "booksnap")]
struct Cli {
    /// JSON file holding a full invocation record; overrides the flags below
    #[arg(long)]
    event: Option<PathBuf>,

    /// "Coinbase" or "Kraken"
    #[arg(long)]
    exchange: Option<String>,

    /// Book depth level, forwarded to the venue endpoint where supported
    #[arg(long, default_value_t = 2)]
    level: u32,

    /// Normalized ticker, e.g. "BTC"
    #[arg(long)]
    market: Option<String>,

    #[arg(long)]
    bucket_name: Option<String>,

    #[arg(long, default_value = "orderbooks")]
    bucket_prefix: String,

    /// Per-side notional cap; levels past the first crossing are dropped
    #[arg(long, default_value_t = 1000.0)]
    max_amount_sum: f64,

    /// 1 to prepend the CSV header row
    #[arg(long, default_value_t = 0)]
    write_csv_headers: u8,
}

impl Cli {
    fn into_invocation(self) -> anyhow::Result<Invocation> {
        if let Some(path) = &self.event {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("reading event file {}", path.display()))?;
            return serde_json::from_str(&body)
                .with_context(|| format!("parsing event file {}", path.display()));
        }

        Ok(Invocation {
            exchange: self.exchange.context("--exchange is required without --event")?,
            level: self.level,
            market: self.market.context("--market is required without --event")?,
            bucket_name: self.bucket_name.context("--bucket-name is required without --event")?,
            bucket_prefix: self.bucket_prefix,
            max_amount_sum: self.max_amount_sum,
            write_csv_headers: self.write_csv_headers,
        })
    }
}

fn object_store(client: &Client) -> Box<dyn ObjectStore> {
    match env::var("OBJECT_STORE_ENDPOINT") {
        Ok(endpoint) => Box::new(HttpObjectStore::new(
            client.clone(),
            endpoint,
            env::var("OBJECT_STORE_TOKEN").ok(),
        )),
        Err(_) => {
            let root = env::var("OBJECT_STORE_ROOT").unwrap_or_else(|_| "./data".to_string());
            Box::new(FsObjectStore::new(root))
        }
    }
}

fn metric_store(client: &Client) -> Box<dyn MetricStore> {
    match env::var("METRIC_STORE_ENDPOINT") {
        Ok(endpoint) => Box::new(HttpMetricStore::new(
            client.clone(),
            endpoint,
            env::var("METRIC_STORE_TOKEN").ok(),
        )),
        Err(_) => Box::new(LogMetricStore),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env
    telemetry::init_tracing("info");
    telemetry::init_metrics();

    let invocation = Cli::parse().into_invocation()?;

    let metric_target = MetricTarget {
        database: env::var("METRIC_DATABASE").unwrap_or_else(|_| "CrytoExchangeData".to_string()),
        table: env::var("METRIC_TABLE").unwrap_or_else(|_| "orderbookdata".to_string()),
    };

    let client = Client::new();
    let pipeline = Pipeline::new(
        client.clone(),
        object_store(&client),
        metric_store(&client),
        metric_target,
    );

    let outcome = pipeline.run(&invocation).await?;
    println!("{}", outcome.message);
    Ok(())
}
