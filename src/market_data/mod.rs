// Market data module entrypoint
pub mod types;      // shared value objects + error enum
pub mod adapters;   // venue-specific symbol building & book extraction
pub mod normaliser; // defensive re-sort of book levels
pub mod aggregator; // volume-capped walk over the sorted book
pub mod summary;    // mid-price derivation
pub mod formatter;  // CSV rows + metric record
