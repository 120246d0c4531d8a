//! Drives the whole run: libraries in order, lineages in key order.

use crate::core::{MajorKey, VersionRecord};
use crate::lineage::{resolve, LineageAggregator, LineageOutcome};
use crate::progress::{ProgressManager, TEMPLATE_LIBRARIES};
use crate::source::{ArtifactFetcher, PackageIndex};
use serde::Serialize;
use std::time::Duration;

/// A lineage for which every candidate failed acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedLineage {
    pub library: String,
    pub major: MajorKey,
    pub attempted: Vec<String>,
}

/// A library whose version listing could not be obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexFailure {
    pub library: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub records: Vec<VersionRecord>,
    pub dropped: Vec<DroppedLineage>,
    pub index_failures: Vec<IndexFailure>,
}

pub struct PipelineDriver<'a> {
    index: &'a dyn PackageIndex,
    fetcher: &'a dyn ArtifactFetcher,
    aggregator: LineageAggregator,
    progress: ProgressManager,
    library_delay: Duration,
}

impl<'a> PipelineDriver<'a> {
    pub fn new(
        index: &'a dyn PackageIndex,
        fetcher: &'a dyn ArtifactFetcher,
        aggregator: LineageAggregator,
    ) -> Self {
        Self {
            index,
            fetcher,
            aggregator,
            progress: ProgressManager::hidden(),
            library_delay: Duration::ZERO,
        }
    }

    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_library_delay(mut self, delay: Duration) -> Self {
        self.library_delay = delay;
        self
    }

    pub fn run(&mut self, libraries: &[String]) -> PipelineReport {
        let mut report = PipelineReport::default();
        let bar = self
            .progress
            .create_bar(libraries.len() as u64, TEMPLATE_LIBRARIES);

        for (i, library) in libraries.iter().enumerate() {
            if i > 0 && !self.library_delay.is_zero() {
                std::thread::sleep(self.library_delay);
            }
            bar.set_message(library.clone());
            self.run_library(library, &mut report);
            bar.inc(1);
        }

        bar.finish_and_clear();
        report
    }

    fn run_library(&mut self, library: &str, report: &mut PipelineReport) {
        let index = match self.index.release_index(library) {
            Ok(index) => index,
            Err(e) => {
                log::error!("Failed to list versions of {}: {}", library, e);
                report.index_failures.push(IndexFailure {
                    library: library.to_string(),
                    message: e.to_string(),
                });
                return;
            }
        };

        let lineages = resolve(index.list_versions(), |v| index.has_release_artifacts(v));
        log::info!("{}: {} major lineages", library, lineages.len());

        for (major, candidates) in lineages {
            let spinner = self
                .progress
                .create_spinner(&format!("{} {}.x", library, major));

            match self.aggregator.aggregate(library, &candidates, self.fetcher) {
                LineageOutcome::Recorded(record) => report.records.push(record),
                LineageOutcome::Unacquired { attempted } => {
                    log::warn!(
                        "Dropping {} {}.x: none of {} candidates could be acquired",
                        library,
                        major,
                        attempted.len()
                    );
                    report.dropped.push(DroppedLineage {
                        library: library.to_string(),
                        major,
                        attempted,
                    });
                }
            }

            spinner.finish_and_clear();
        }
    }
}
