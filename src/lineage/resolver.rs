use crate::core::{MajorKey, VersionIdentifier};
use std::collections::{BTreeMap, HashSet};

/// Acquisition candidates per major version, keys in numeric order
pub type Lineages = BTreeMap<MajorKey, Vec<VersionIdentifier>>;

/// Group published versions into major lineages.
///
/// Versions without release artifacts are discarded first. A version whose
/// major prefix has no leading digits belongs to no lineage. Each lineage is
/// sorted ascending by numeric components, ties keeping input order, so the
/// lowest version of a major line is the first acquisition candidate.
pub fn resolve<I, S, F>(raw_versions: I, has_artifacts: F) -> Lineages
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    let mut lineages = Lineages::new();

    for raw in raw_versions {
        let raw = raw.as_ref();
        if !seen.insert(raw.to_string()) || !has_artifacts(raw) {
            continue;
        }

        let version = VersionIdentifier::new(raw);
        match version.major_key() {
            Some(key) => lineages.entry(key).or_default().push(version),
            None => log::debug!("Version '{}' has no major number, skipping", raw),
        }
    }

    for candidates in lineages.values_mut() {
        candidates.sort_by(|a, b| a.compare_components(b));
    }

    lineages
}
