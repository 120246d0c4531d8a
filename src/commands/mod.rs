//! CLI command implementations.
//!
//! - **run**: resolve, acquire and analyze every configured library
//! - **resolve**: show the lineages and candidate order of one package
//! - **analyze**: summarize one release tree already on disk
//! - **init**: write a default `.lineagemap.toml`

pub mod analyze;
pub mod init;
pub mod resolve;
pub mod run;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
pub use resolve::{handle_resolve, ResolveConfig};
pub use run::{handle_run, RunConfig};

use crate::analyzers::FileMetricsEngine;
use crate::cli::SourceArgs;
use crate::config::{self, AnalysisConfig, IndexKind, LineagemapConfig, SourceConfig};
use crate::io::{create_writer, ensure_parent_dir, OutputFormat};
use crate::core::VersionRecord;
use crate::lineage::LineageAggregator;
use crate::source::{MirrorSource, PackageIndex, PypiIndex};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

/// Explicit config file when given, otherwise the upward search
pub(crate) fn load_config(path: Option<&Path>) -> Result<LineagemapConfig> {
    match path {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load_config()),
    }
}

pub(crate) fn apply_source_overrides(source: &mut SourceConfig, args: &SourceArgs) {
    if let Some(index) = args.index {
        source.index = index.into();
    }
    if let Some(mirror) = &args.mirror {
        source.mirror_dir = mirror.clone();
    }
}

pub(crate) fn open_index(source: &SourceConfig) -> Result<Box<dyn PackageIndex>> {
    Ok(match source.index {
        IndexKind::Mirror => Box::new(MirrorSource::new(&source.mirror_dir)),
        IndexKind::Pypi => Box::new(
            PypiIndex::new(&source.pypi_url, Duration::from_secs(source.timeout_secs))
                .context("Failed to create PyPI client")?,
        ),
    })
}

pub(crate) fn build_aggregator(analysis: &AnalysisConfig) -> Result<LineageAggregator> {
    let engine = FileMetricsEngine::new(analysis.fixer_set())?;
    Ok(LineageAggregator::new(engine)
        .with_extensions(analysis.extensions.clone())
        .with_exclude(analysis.exclude.clone()))
}

/// Write records to `path`, or to stdout when there is none
pub(crate) fn write_records(
    records: &[VersionRecord],
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<()> {
    let destination: Box<dyn std::io::Write> = match path {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };
    create_writer(format, destination).write_records(records)
}
