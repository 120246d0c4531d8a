use super::{apply_source_overrides, load_config, open_index};
use crate::cli::SourceArgs;
use crate::lineage::{resolve, Lineages};
use anyhow::{Context, Result};
use colored::*;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    pub package: String,
    pub config: Option<PathBuf>,
    pub source: SourceArgs,
}

pub fn handle_resolve(resolve_config: ResolveConfig) -> Result<()> {
    let mut config = load_config(resolve_config.config.as_deref())?;
    apply_source_overrides(&mut config.source, &resolve_config.source);

    let package = &resolve_config.package;
    let index = open_index(&config.source)?
        .release_index(package)
        .with_context(|| format!("Failed to list versions of {}", package))?;

    let listed = index.list_versions().count();
    let lineages = resolve(index.list_versions(), |v| index.has_release_artifacts(v));

    println!("{} ({} versions listed)", package.bold(), listed);
    print!("{}", render_lineages(&lineages));
    Ok(())
}

/// One line per lineage: major key, then candidates in acquisition order
pub fn render_lineages(lineages: &Lineages) -> String {
    if lineages.is_empty() {
        return "  no lineages\n".to_string();
    }

    let mut out = String::new();
    for (major, candidates) in lineages {
        let versions: Vec<&str> = candidates.iter().map(|v| v.as_str()).collect();
        let _ = writeln!(out, "  {}.x: {}", major, versions.join(", "));
    }
    out
}
