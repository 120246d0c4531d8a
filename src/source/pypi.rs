use super::{PackageIndex, Release, ReleaseIndex};
use crate::core::SourceError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_PYPI_URL: &str = "https://pypi.org/pypi";

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    #[serde(default)]
    releases: BTreeMap<String, Vec<IgnoredAny>>,
}

/// Version listing from the PyPI JSON API (`GET {base}/{package}/json`)
pub struct PypiIndex {
    base_url: String,
    client: Client,
}

impl PypiIndex {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lineagemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn project_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url.trim_end_matches('/'), package)
    }
}

impl PackageIndex for PypiIndex {
    fn release_index(&self, package: &str) -> Result<ReleaseIndex, SourceError> {
        let url = self.project_url(package);
        log::debug!("Querying {}", url);

        let response = self.client.get(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::PackageNotFound(package.to_string()));
        }
        let body = response.error_for_status()?.text()?;
        parse_release_index(package, &body)
    }
}

/// Decode a PyPI project document into a release index
pub fn parse_release_index(package: &str, body: &str) -> Result<ReleaseIndex, SourceError> {
    let project: ProjectResponse = serde_json::from_str(body).map_err(SourceError::Decode)?;
    let releases = project
        .releases
        .into_iter()
        .map(|(version, files)| Release {
            version,
            artifact_count: files.len(),
        })
        .collect();
    Ok(ReleaseIndex::new(package, releases))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_index() {
        let body = r#"{
            "info": {"name": "click"},
            "releases": {
                "0.1": [],
                "1.0": [{"filename": "click-1.0.tar.gz", "packagetype": "sdist"}],
                "2.0a1": [{"filename": "a"}, {"filename": "b"}]
            }
        }"#;
        let index = parse_release_index("click", body).unwrap();

        assert_eq!(index.package, "click");
        assert_eq!(
            index.list_versions().collect::<Vec<_>>(),
            vec!["0.1", "1.0", "2.0a1"]
        );
        assert!(!index.has_release_artifacts("0.1"));
        assert!(index.has_release_artifacts("1.0"));
        assert!(index.has_release_artifacts("2.0a1"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_release_index("click", "<html>"),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_project_url() {
        let index = PypiIndex::new("https://pypi.org/pypi/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            index.project_url("requests"),
            "https://pypi.org/pypi/requests/json"
        );
    }
}
