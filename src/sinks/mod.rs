pub mod types;
pub use types::*;
pub mod fs;
pub mod http;
pub mod log;
#[cfg(test)]
pub mod mem;

use async_trait::async_trait;

/// Bulk destination for the serialized rows.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> SinkResult<()>;
}

/// Time-series destination for metric points.
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn write_records(
        &self,
        database: &str,
        table: &str,
        records: &[MetricRecord],
    ) -> SinkResult<()>;
}
