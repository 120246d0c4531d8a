//! `.lineagemap.toml` configuration: target libraries, artifact source,
//! analysis options and output.

mod core;
mod loader;

pub use self::core::{AnalysisConfig, IndexKind, LineagemapConfig, OutputConfig, SourceConfig};
pub use loader::{
    directory_ancestors, find_config_from, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# Lineagemap Configuration

# Packages analyzed, in order
libraries = ["marshmallow", "pydantic", "click", "python-dateutil", "requests"]

[source]
# "mirror" lists versions from mirror_dir/<package>/<version>/
# "pypi" lists versions from the PyPI JSON API
index = "mirror"
mirror_dir = "library-versions"
pypi_url = "https://pypi.org/pypi"
timeout_secs = 30
library_delay_ms = 0

[analysis]
extensions = ["py"]
exclude = []
fixers = ["print", "exec", "except", "ne", "numeric", "raise", "repr", "unicode"]

[output]
path = "maintainability_results.json"
format = "json"
"#;

/// Write the default configuration into `dir`
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    log::info!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::Fixer;
    use crate::io::OutputFormat;
    use indoc::indoc;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_file_matches_defaults() {
        let parsed = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, LineagemapConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            libraries = ["click"]

            [source]
            index = "pypi"

            [analysis]
            fixers = ["print"]
        "#})
        .unwrap();

        assert_eq!(config.libraries, vec!["click"]);
        assert_eq!(config.source.index, IndexKind::Pypi);
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.analysis.fixers, vec![Fixer::Print]);
        assert!(!config.analysis.fixer_set().contains(Fixer::Raise));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.path, PathBuf::from("maintainability_results.json"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(parse_and_validate_config("libraries = 3").is_err());
        assert!(parse_and_validate_config("[source]\ntimeout_secs = 0").is_err());
        assert!(parse_and_validate_config("[analysis]\nfixers = [\"walrus\"]").is_err());
    }

    #[test]
    fn test_config_search_walks_upward() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "libraries = [\"requests\"]\n").unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = find_config_from(nested);
        assert_eq!(config.libraries, vec!["requests"]);
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "libraries = [").unwrap();
        let config = find_config_from(temp.path().to_path_buf());
        assert_eq!(config, LineagemapConfig::default());
    }

    #[test]
    fn test_explicit_config_errors() {
        let temp = TempDir::new().unwrap();
        assert!(load_config_from_path(&temp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }

    #[test]
    fn test_init_config() {
        let temp = TempDir::new().unwrap();
        init_config(temp.path(), false).unwrap();
        assert!(temp.path().join(CONFIG_FILE_NAME).exists());
        assert!(init_config(temp.path(), false).is_err());
        init_config(temp.path(), true).unwrap();
    }
}
