//! Core data model: versions, per-file metrics, debt counts and records.

pub mod errors;
pub mod types;
pub mod version;

pub use errors::{Error, Result, SourceError, UnanalyzableFile};
pub use types::{round2, DebtMarker, FileMetrics, TechDebtCounts, VersionRecord};
pub use version::{major_key, MajorKey, VersionIdentifier};
