use super::{ArtifactFetcher, PackageIndex, Release, ReleaseIndex, SourceTree};
use crate::core::SourceError;
use std::fs;
use std::path::{Path, PathBuf};

/// Releases already unpacked on disk as `<root>/<package>/<version>/`
#[derive(Debug, Clone)]
pub struct MirrorSource {
    root: PathBuf,
}

impl MirrorSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, package: &str) -> Option<PathBuf> {
        is_plain_name(package).then(|| self.root.join(package))
    }
}

/// Reject names that would escape the mirror directory
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn count_entries(dir: &Path) -> Result<usize, SourceError> {
    let entries = fs::read_dir(dir).map_err(|e| SourceError::io(dir, e))?;
    Ok(entries.filter_map(|e| e.ok()).count())
}

impl PackageIndex for MirrorSource {
    fn release_index(&self, package: &str) -> Result<ReleaseIndex, SourceError> {
        let dir = self
            .package_dir(package)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| SourceError::PackageNotFound(package.to_string()))?;

        let mut versions: Vec<(String, PathBuf)> = fs::read_dir(&dir)
            .map_err(|e| SourceError::io(&dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect();
        versions.sort_by(|a, b| a.0.cmp(&b.0));

        let mut releases = Vec::with_capacity(versions.len());
        for (version, path) in versions {
            releases.push(Release {
                version,
                artifact_count: count_entries(&path)?,
            });
        }

        Ok(ReleaseIndex::new(package, releases))
    }
}

impl ArtifactFetcher for MirrorSource {
    fn fetch(&self, package: &str, version: &str) -> Result<SourceTree, SourceError> {
        let dir = self
            .package_dir(package)
            .filter(|_| is_plain_name(version))
            .map(|dir| dir.join(version))
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| SourceError::release_not_found(package, version))?;

        if count_entries(&dir)? == 0 {
            return Err(SourceError::EmptyRelease {
                package: package.to_string(),
                version: version.to_string(),
            });
        }

        log::debug!("Using mirrored release {}", dir.display());
        Ok(SourceTree::new(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mirror() -> TempDir {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("click");
        fs::create_dir_all(pkg.join("1.0")).unwrap();
        fs::write(pkg.join("1.0/core.py"), "x = 1\n").unwrap();
        fs::create_dir_all(pkg.join("2.0")).unwrap();
        fs::write(pkg.join("notes.txt"), "not a release").unwrap();
        temp
    }

    #[test]
    fn test_release_index_lists_directories() {
        let temp = mirror();
        let source = MirrorSource::new(temp.path());
        let index = source.release_index("click").unwrap();

        assert_eq!(index.list_versions().collect::<Vec<_>>(), vec!["1.0", "2.0"]);
        assert!(index.has_release_artifacts("1.0"));
        assert!(!index.has_release_artifacts("2.0"));
    }

    #[test]
    fn test_unknown_package() {
        let temp = mirror();
        let source = MirrorSource::new(temp.path());
        assert!(matches!(
            source.release_index("flask"),
            Err(SourceError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_fetch() {
        let temp = mirror();
        let source = MirrorSource::new(temp.path());

        let tree = source.fetch("click", "1.0").unwrap();
        assert_eq!(tree.root(), temp.path().join("click/1.0"));

        assert!(matches!(
            source.fetch("click", "2.0"),
            Err(SourceError::EmptyRelease { .. })
        ));
        assert!(matches!(
            source.fetch("click", "3.0"),
            Err(SourceError::ReleaseNotFound { .. })
        ));
    }

    #[test]
    fn test_fetch_rejects_path_escapes() {
        let temp = mirror();
        let source = MirrorSource::new(temp.path().join("click"));
        assert!(source.fetch("..", "click").is_err());
        assert!(source.fetch("click", "../click/1.0").is_err());
    }
}
