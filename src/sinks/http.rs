// HTTP implementations of both sink traits.
//
// The object store speaks plain PUT against an S3-compatible endpoint; the
// metric store POSTs a WriteRecords-shaped JSON body to an ingest endpoint.
// Credentials, when present, ride along as a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::{MetricRecord, MetricStore, ObjectStore, SinkError, SinkResult};

pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(client: Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self { client, endpoint: endpoint.into(), token }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> SinkResult<()> {
        let url = format!("{}/{}/{}", self.endpoint.trim_end_matches('/'), bucket, key);
        let rejected = |reason: String| SinkError::ObjectStore { key: key.to_string(), reason };

        let mut request = self.client.put(&url).body(bytes.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| rejected(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(format!("HTTP {status}: {body}")));
        }

        info!(url = %url, bytes = bytes.len(), "stored object");
        Ok(())
    }
}

pub struct HttpMetricStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpMetricStore {
    pub fn new(client: Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self { client, endpoint: endpoint.into(), token }
    }
}

#[derive(Serialize)]
struct WriteRecordsBody<'a> {
    #[serde(rename = "DatabaseName")]
    database_name: &'a str,
    #[serde(rename = "TableName")]
    table_name: &'a str,
    #[serde(rename = "Records")]
    records: &'a [MetricRecord],
}

#[async_trait]
impl MetricStore for HttpMetricStore {
    async fn write_records(
        &self,
        database: &str,
        table: &str,
        records: &[MetricRecord],
    ) -> SinkResult<()> {
        let rejected = |reason: String| SinkError::MetricStore {
            database: database.to_string(),
            table: table.to_string(),
            reason,
        };

        let body = WriteRecordsBody { database_name: database, table_name: table, records };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| rejected(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(rejected(format!("HTTP {status}: {text}")));
        }

        info!(database, table, count = records.len(), "wrote metric records");
        Ok(())
    }
}
