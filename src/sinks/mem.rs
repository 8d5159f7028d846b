// In-memory test doubles for the sink traits.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{MetricRecord, MetricStore, ObjectStore, SinkError, SinkResult};

#[derive(Default)]
pub struct MemObjectStore {
    pub objects: Mutex<Vec<(String, String, Vec<u8>)>>,
}

#[async_trait]
impl ObjectStore for MemObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> SinkResult<()> {
        self.objects
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemMetricStore {
    pub writes: Mutex<Vec<(String, String, Vec<MetricRecord>)>>,
}

#[async_trait]
impl MetricStore for MemMetricStore {
    async fn write_records(
        &self,
        database: &str,
        table: &str,
        records: &[MetricRecord],
    ) -> SinkResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((database.to_string(), table.to_string(), records.to_vec()));
        Ok(())
    }
}

/// Always rejects, for exercising partial-failure paths.
pub struct FailingMetricStore;

#[async_trait]
impl MetricStore for FailingMetricStore {
    async fn write_records(
        &self,
        database: &str,
        table: &str,
        _records: &[MetricRecord],
    ) -> SinkResult<()> {
        Err(SinkError::MetricStore {
            database: database.to_string(),
            table: table.to_string(),
            reason: "injected failure".to_string(),
        })
    }
}
