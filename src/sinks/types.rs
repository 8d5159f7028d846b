use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("object store rejected {key}: {reason}")]
    ObjectStore { key: String, reason: String },
    #[error("metric store rejected write to {database}.{table}: {reason}")]
    MetricStore { database: String, table: String, reason: String },
}

pub type SinkResult<T> = Result<T, SinkError>;

/// One dimensioned time-series point, in the metric store's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "Dimensions")]
    pub dimensions: Vec<Dimension>,
    #[serde(rename = "MeasureName")]
    pub measure_name: String,
    #[serde(rename = "MeasureValue")]
    pub measure_value: String,
    #[serde(rename = "MeasureValueType")]
    pub measure_value_type: String,
    /// Milliseconds since epoch, as a string on the wire.
    #[serde(rename = "Time")]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}
