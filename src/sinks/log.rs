// Fallback metric sink for local runs: records go to the structured log
// instead of a real time-series store.

use async_trait::async_trait;
use tracing::info;

use super::{MetricRecord, MetricStore, SinkResult};

pub struct LogMetricStore;

#[async_trait]
impl MetricStore for LogMetricStore {
    async fn write_records(
        &self,
        database: &str,
        table: &str,
        records: &[MetricRecord],
    ) -> SinkResult<()> {
        for record in records {
            info!(
                database,
                table,
                measure = %record.measure_name,
                value = %record.measure_value,
                time = %record.time,
                "metric record"
            );
        }
        Ok(())
    }
}
