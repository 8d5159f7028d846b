pub mod market_data; // adapter -> normaliser -> aggregator -> summary -> formatter
pub mod pipeline;    // one-invocation orchestration
pub mod sinks;       // object store + metric store seams
pub mod telemetry;   // tracing + optional prometheus exporter
