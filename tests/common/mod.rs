// Shared helpers for lineagemap integration tests
#![allow(dead_code)]

use lineagemap::analyzers::FileMetricsEngine;
use lineagemap::compat::FixerSet;
use lineagemap::lineage::LineageAggregator;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Builds `<root>/<package>/<version>/<file>` release trees
pub struct MirrorBuilder {
    dir: TempDir,
}

impl MirrorBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp mirror"),
        }
    }

    pub fn file(self, package: &str, version: &str, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(package).join(version).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create release dir");
        }
        fs::write(&path, content).expect("write release file");
        self
    }

    pub fn empty_release(self, package: &str, version: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(package).join(version)).expect("create release dir");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

pub fn aggregator() -> LineageAggregator {
    LineageAggregator::new(FileMetricsEngine::new(FixerSet::all()).expect("python grammar"))
}
