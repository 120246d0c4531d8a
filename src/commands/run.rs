use super::{apply_source_overrides, build_aggregator, load_config, open_index, write_records};
use crate::cli::SourceArgs;
use crate::io::output::{OutputFormat, OutputWriter, TerminalWriter};
use crate::pipeline::{PipelineDriver, PipelineReport};
use crate::progress::{ProgressConfig, ProgressManager};
use crate::source::MirrorSource;
use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub config: Option<PathBuf>,
    pub libraries: Vec<String>,
    pub source: SourceArgs,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub verbosity: u8,
    pub quiet: bool,
}

pub fn handle_run(run: RunConfig) -> Result<()> {
    let mut config = load_config(run.config.as_deref())?;
    if !run.libraries.is_empty() {
        config.libraries = run.libraries.clone();
    }
    apply_source_overrides(&mut config.source, &run.source);
    if let Some(output) = run.output {
        config.output.path = output;
    }
    if let Some(format) = run.format {
        config.output.format = format;
    }

    let index = open_index(&config.source)?;
    let fetcher = MirrorSource::new(&config.source.mirror_dir);
    let progress = ProgressManager::new(ProgressConfig::from_env(run.quiet, run.verbosity));

    let mut driver = PipelineDriver::new(&*index, &fetcher, build_aggregator(&config.analysis)?)
        .with_progress(progress.clone())
        .with_library_delay(Duration::from_millis(config.source.library_delay_ms));
    let report = driver.run(&config.libraries);
    progress.clear()?;

    match config.output.format {
        OutputFormat::Terminal => TerminalWriter::default().write_records(&report.records)?,
        format => {
            write_records(&report.records, format, Some(&config.output.path))?;
            log::info!(
                "Wrote {} records to {}",
                report.records.len(),
                config.output.path.display()
            );
            if !run.quiet {
                TerminalWriter::default().write_records(&report.records)?;
                println!("Results saved to {}", config.output.path.display());
            }
        }
    }

    if !run.quiet {
        print_problems(&report);
    }
    Ok(())
}

fn print_problems(report: &PipelineReport) {
    for failure in &report.index_failures {
        println!(
            "{} {}: {}",
            "index failure".red().bold(),
            failure.library,
            failure.message
        );
    }
    for dropped in &report.dropped {
        println!(
            "{} {} {}.x (tried {})",
            "dropped".yellow().bold(),
            dropped.library,
            dropped.major,
            dropped.attempted.join(", ")
        );
    }
}
