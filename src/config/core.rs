use crate::compat::{Fixer, FixerSet};
use crate::io::output::OutputFormat;
use crate::source::pypi::DEFAULT_PYPI_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for lineagemap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineagemapConfig {
    /// Packages to analyze, in processing order
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for LineagemapConfig {
    fn default() -> Self {
        Self {
            libraries: default_libraries(),
            source: SourceConfig::default(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl LineagemapConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.libraries.iter().any(|lib| lib.trim().is_empty()) {
            return Err("library names must not be empty".to_string());
        }
        if self.source.timeout_secs == 0 {
            return Err("source.timeout_secs must be greater than 0".to_string());
        }
        if self.analysis.extensions.is_empty() {
            return Err("analysis.extensions must list at least one extension".to_string());
        }
        Ok(())
    }
}

fn default_libraries() -> Vec<String> {
    ["marshmallow", "pydantic", "click", "python-dateutil", "requests"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Versions listed from a local mirror directory
    #[default]
    Mirror,
    /// Versions listed from the PyPI JSON API
    Pypi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub index: IndexKind,

    /// Root of `<package>/<version>/` release trees
    #[serde(default = "default_mirror_dir")]
    pub mirror_dir: PathBuf,

    #[serde(default = "default_pypi_url")]
    pub pypi_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between libraries
    #[serde(default)]
    pub library_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            index: IndexKind::default(),
            mirror_dir: default_mirror_dir(),
            pypi_url: default_pypi_url(),
            timeout_secs: default_timeout_secs(),
            library_delay_ms: 0,
        }
    }
}

fn default_mirror_dir() -> PathBuf {
    PathBuf::from("library-versions")
}

fn default_pypi_url() -> String {
    DEFAULT_PYPI_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns relative to the release root
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_fixers")]
    pub fixers: Vec<Fixer>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: Vec::new(),
            fixers: default_fixers(),
        }
    }
}

impl AnalysisConfig {
    pub fn fixer_set(&self) -> FixerSet {
        FixerSet::only(self.fixers.iter().copied())
    }
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_fixers() -> Vec<Fixer> {
    Fixer::ALL.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("maintainability_results.json")
}
