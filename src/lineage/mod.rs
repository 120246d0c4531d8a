//! Major-version lineage resolution and per-lineage aggregation.

pub mod aggregator;
pub mod resolver;

pub use aggregator::{decode_dropping_invalid, LineageAccumulator, LineageAggregator, LineageOutcome};
pub use resolver::{resolve, Lineages};
