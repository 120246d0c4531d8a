//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lineagemap operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Package index or release fetch errors
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by a package index or release fetcher
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("package '{0}' not found")]
    PackageNotFound(String),

    #[error("release {package}=={version} not available")]
    ReleaseNotFound { package: String, version: String },

    #[error("release {package}=={version} has no files")]
    EmptyRelease { package: String, version: String },

    #[error("index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid index response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn release_not_found(package: &str, version: &str) -> Self {
        Self::ReleaseNotFound {
            package: package.to_string(),
            version: version.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A file whose text could not be analyzed, even after compatibility conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnanalyzableFile {
    /// The text does not parse under the modern grammar and conversion did not help
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Not a grammar problem: unusable content such as NUL bytes
    #[error("unusable content: {0}")]
    Content(String),
}
