//! Maintainability metrics across the major-version lineage of Python
//! libraries.
//!
//! For each library the published versions are grouped into major lineages
//! ([`lineage::resolve`]), one release per lineage is acquired, and every
//! source file in it is analyzed ([`analyzers::FileMetricsEngine`]). Files
//! that only parse under the legacy grammar are rewritten by
//! [`compat::CompatibilityConverter`] first. Per-file metrics are folded into
//! one [`core::VersionRecord`] per lineage.

pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod compat;
pub mod complexity;
pub mod config;
pub mod core;
pub mod debt;
pub mod io;
pub mod lineage;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod source;

pub use crate::analyzers::{FileMetricsEngine, ParseOutcome, PythonParser};
pub use crate::compat::{CompatibilityConverter, Fixer, FixerSet};
pub use crate::config::LineagemapConfig;
pub use crate::core::{
    DebtMarker, Error, FileMetrics, MajorKey, Result, SourceError, TechDebtCounts,
    UnanalyzableFile, VersionIdentifier, VersionRecord,
};
pub use crate::debt::TechDebtScanner;
pub use crate::lineage::{resolve, LineageAggregator, LineageOutcome, Lineages};
pub use crate::pipeline::{PipelineDriver, PipelineReport};
pub use crate::source::{ArtifactFetcher, MirrorSource, PackageIndex, PypiIndex, SourceTree};
