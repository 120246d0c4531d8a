use super::{build_aggregator, load_config, write_records};
use crate::io::output::OutputFormat;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub library: String,
    pub version: String,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn handle_analyze(analyze: AnalyzeConfig) -> Result<()> {
    if !analyze.path.is_dir() {
        anyhow::bail!("{} is not a directory", analyze.path.display());
    }

    let config = load_config(analyze.config.as_deref())?;
    let mut aggregator = build_aggregator(&config.analysis)?;
    let record = aggregator.analyze_tree(&analyze.library, &analyze.version, &analyze.path);

    write_records(
        std::slice::from_ref(&record),
        analyze.format,
        analyze.output.as_deref(),
    )
}
