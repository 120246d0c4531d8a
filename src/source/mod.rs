//! Artifact sources: where version lists and release source trees come from.
//!
//! The pipeline only needs two seams:
//!
//! - [`PackageIndex`]: every published version of a package and whether it
//!   has release artifacts;
//! - [`ArtifactFetcher`]: a local source tree for one `(package, version)`.
//!
//! Fetching must be idempotent: a failed attempt leaves nothing behind that a
//! later attempt could observe.

pub mod mirror;
pub mod pypi;

pub use mirror::MirrorSource;
pub use pypi::PypiIndex;

use crate::core::SourceError;
use std::path::{Path, PathBuf};

/// One published version and the number of files released for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub artifact_count: usize,
}

/// All published versions of a package, artifacts or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseIndex {
    pub package: String,
    pub releases: Vec<Release>,
}

impl ReleaseIndex {
    pub fn new(package: impl Into<String>, releases: Vec<Release>) -> Self {
        Self {
            package: package.into(),
            releases,
        }
    }

    pub fn list_versions(&self) -> impl Iterator<Item = &str> {
        self.releases.iter().map(|r| r.version.as_str())
    }

    pub fn has_release_artifacts(&self, version: &str) -> bool {
        self.releases
            .iter()
            .any(|r| r.version == version && r.artifact_count > 0)
    }
}

pub trait PackageIndex {
    fn release_index(&self, package: &str) -> Result<ReleaseIndex, SourceError>;
}

/// Handle to an unpacked release on local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

pub trait ArtifactFetcher {
    fn fetch(&self, package: &str, version: &str) -> Result<SourceTree, SourceError>;
}
