use crate::analyzers::FileMetricsEngine;
use crate::core::{round2, FileMetrics, TechDebtCounts, VersionIdentifier, VersionRecord};
use crate::debt::TechDebtScanner;
use crate::io::walker::FileWalker;
use crate::source::ArtifactFetcher;
use std::fs;
use std::path::Path;

/// Result of processing one major lineage
#[derive(Debug, Clone, PartialEq)]
pub enum LineageOutcome {
    /// The first acquirable candidate was analyzed
    Recorded(VersionRecord),
    /// Every candidate failed acquisition
    Unacquired { attempted: Vec<String> },
}

impl LineageOutcome {
    pub fn into_record(self) -> Option<VersionRecord> {
        match self {
            LineageOutcome::Recorded(record) => Some(record),
            LineageOutcome::Unacquired { .. } => None,
        }
    }
}

/// Running sums for one release, folded file by file.
#[derive(Debug, Clone, Default)]
pub struct LineageAccumulator {
    maintainability: Vec<f64>,
    complexities: Vec<u32>,
    loc: usize,
    sloc: usize,
    comments: usize,
    markers: TechDebtCounts,
    analyzed: usize,
    skipped: usize,
}

impl LineageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, metrics: &FileMetrics, markers: &TechDebtCounts) {
        self.maintainability.push(metrics.maintainability);
        self.complexities.extend_from_slice(&metrics.complexities);
        self.loc += metrics.loc;
        self.sloc += metrics.sloc;
        self.comments += metrics.comments;
        self.markers.merge(markers);
        self.analyzed += 1;
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn finish(self, library: &str, version: &str) -> VersionRecord {
        let avg_complexity = mean(self.complexities.iter().map(|&c| f64::from(c)));
        let comment_ratio = if self.sloc == 0 {
            0.0
        } else {
            self.comments as f64 / self.sloc as f64 * 100.0
        };

        VersionRecord {
            library: library.to_string(),
            version: version.to_string(),
            avg_maintainability: round2(mean(self.maintainability.iter().copied())),
            avg_complexity: round2(avg_complexity),
            max_complexity: self.complexities.iter().copied().max().unwrap_or(0),
            total_loc: self.loc,
            total_sloc: self.sloc,
            total_comments: self.comments,
            comment_ratio: round2(comment_ratio),
            total_markers: self.markers.total(),
            tech_debt_markers: self.markers,
            files_analyzed: self.analyzed,
            files_skipped: self.skipped,
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

/// Decode UTF-8, dropping invalid byte sequences instead of replacing them
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Picks one release per lineage and summarizes its source files.
pub struct LineageAggregator {
    engine: FileMetricsEngine,
    scanner: TechDebtScanner,
    extensions: Vec<String>,
    exclude: Vec<String>,
}

impl LineageAggregator {
    pub fn new(engine: FileMetricsEngine) -> Self {
        Self {
            engine,
            scanner: TechDebtScanner::new(),
            extensions: vec!["py".to_string()],
            exclude: vec![],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Try candidates in order; the first one fetched is analyzed.
    pub fn aggregate(
        &mut self,
        library: &str,
        lineage: &[VersionIdentifier],
        fetcher: &dyn ArtifactFetcher,
    ) -> LineageOutcome {
        let mut attempted = Vec::with_capacity(lineage.len());

        for candidate in lineage {
            attempted.push(candidate.to_string());
            match fetcher.fetch(library, candidate.as_str()) {
                Ok(tree) => {
                    log::info!("Analyzing {} {}", library, candidate);
                    let record = self.analyze_tree(library, candidate.as_str(), tree.root());
                    return LineageOutcome::Recorded(record);
                }
                Err(e) => {
                    log::warn!("Could not acquire {} {}: {}", library, candidate, e);
                }
            }
        }

        LineageOutcome::Unacquired { attempted }
    }

    /// Analyze every source file under `root` into one record
    pub fn analyze_tree(&mut self, library: &str, version: &str, root: &Path) -> VersionRecord {
        let mut acc = LineageAccumulator::new();

        let files = FileWalker::new(root)
            .with_extensions(self.extensions.clone())
            .with_ignore_patterns(&self.exclude)
            .walk()
            .unwrap_or_else(|e| {
                log::warn!("Could not enumerate {}: {}", root.display(), e);
                Vec::new()
            });

        for path in &files {
            self.fold_file(&mut acc, path);
        }

        let record = acc.finish(library, version);
        log::info!(
            "{} {}: {} files analyzed, {} skipped",
            library,
            version,
            record.files_analyzed,
            record.files_skipped
        );
        record
    }

    fn fold_file(&mut self, acc: &mut LineageAccumulator, path: &Path) {
        let text = match fs::read(path) {
            Ok(bytes) => decode_dropping_invalid(&bytes),
            Err(e) => {
                log::debug!("Skipping {}: {}", path.display(), e);
                acc.skip();
                return;
            }
        };

        match self.engine.analyze(&text) {
            Ok(metrics) => {
                if metrics.converted {
                    log::debug!("Analyzed {} after compatibility conversion", path.display());
                }
                acc.fold(&metrics, &self.scanner.scan(&text));
            }
            Err(e) => {
                log::debug!("Skipping {}: {}", path.display(), e);
                acc.skip();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::FixerSet;
    use crate::core::{DebtMarker, SourceError};
    use crate::source::SourceTree;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn aggregator() -> LineageAggregator {
        LineageAggregator::new(FileMetricsEngine::new(FixerSet::all()).unwrap())
    }

    fn metrics(maintainability: f64, complexities: Vec<u32>, sloc: usize, comments: usize) -> FileMetrics {
        FileMetrics {
            maintainability,
            complexities,
            loc: sloc + 1,
            sloc,
            comments,
            multi: 0,
            blank: 1,
            halstead_volume: 0.0,
            converted: false,
        }
    }

    struct DirFetcher {
        root: PathBuf,
        available: Vec<&'static str>,
    }

    impl ArtifactFetcher for DirFetcher {
        fn fetch(&self, package: &str, version: &str) -> Result<SourceTree, SourceError> {
            if self.available.contains(&version) {
                Ok(SourceTree::new(self.root.clone()))
            } else {
                Err(SourceError::release_not_found(package, version))
            }
        }
    }

    #[test]
    fn test_accumulator_averages() {
        let mut acc = LineageAccumulator::new();
        let mut markers = TechDebtCounts::default();
        markers.add(DebtMarker::Todo, 2);
        acc.fold(&metrics(80.0, vec![1, 4], 30, 3), &markers);
        acc.fold(&metrics(61.111, vec![2], 10, 1), &TechDebtCounts::default());
        acc.skip();

        let record = acc.finish("click", "1.0");
        assert_eq!(record.avg_maintainability, 70.56);
        assert_eq!(record.avg_complexity, 2.33);
        assert_eq!(record.max_complexity, 4);
        assert_eq!(record.total_sloc, 40);
        assert_eq!(record.total_loc, 42);
        assert_eq!(record.total_comments, 4);
        assert_eq!(record.comment_ratio, 10.0);
        assert_eq!(record.tech_debt_markers.todo, 2);
        assert_eq!(record.total_markers, 2);
        assert_eq!(record.files_analyzed, 2);
        assert_eq!(record.files_skipped, 1);
    }

    #[test]
    fn test_empty_accumulator_yields_zeros() {
        let record = LineageAccumulator::new().finish("click", "1.0");
        assert_eq!(record.avg_maintainability, 0.0);
        assert_eq!(record.avg_complexity, 0.0);
        assert_eq!(record.max_complexity, 0);
        assert_eq!(record.comment_ratio, 0.0);
        assert_eq!(record.files_analyzed, 0);
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        assert_eq!(decode_dropping_invalid(b"x = 1\xff\xfe\n"), "x = 1\n");
        assert_eq!(decode_dropping_invalid("é".as_bytes()), "é");
    }

    #[test]
    fn test_analyze_tree_counts_skips() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("good.py"),
            indoc! {"
                def f(a):
                    # TODO: tidy
                    if a:
                        return 1
                    return 0
            "},
        )
        .unwrap();
        fs::write(temp.path().join("bad.py"), "def broken(:\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "# TODO ignored\n").unwrap();

        let record = aggregator().analyze_tree("lib", "1.0", temp.path());
        assert_eq!(record.files_analyzed, 1);
        assert_eq!(record.files_skipped, 1);
        assert_eq!(record.max_complexity, 2);
        assert_eq!(record.tech_debt_markers.todo, 1);
        assert_eq!(record.total_comments, 1);
    }

    #[test]
    fn test_first_acquirable_candidate_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("m.py"), "x = 1\n").unwrap();
        let fetcher = DirFetcher {
            root: temp.path().to_path_buf(),
            available: vec!["1.2", "1.3"],
        };
        let lineage: Vec<_> = ["1.0", "1.2", "1.3"]
            .into_iter()
            .map(VersionIdentifier::new)
            .collect();

        let record = aggregator()
            .aggregate("lib", &lineage, &fetcher)
            .into_record()
            .unwrap();
        assert_eq!(record.version, "1.2");
        assert_eq!(record.files_analyzed, 1);
    }

    #[test]
    fn test_unacquired_lineage() {
        let temp = TempDir::new().unwrap();
        let fetcher = DirFetcher {
            root: temp.path().to_path_buf(),
            available: vec![],
        };
        let lineage = vec![VersionIdentifier::new("2.0"), VersionIdentifier::new("2.1")];

        let outcome = aggregator().aggregate("lib", &lineage, &fetcher);
        assert_eq!(
            outcome,
            LineageOutcome::Unacquired {
                attempted: vec!["2.0".to_string(), "2.1".to_string()]
            }
        );
        assert_eq!(outcome.into_record(), None);
    }
}
