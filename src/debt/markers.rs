use crate::core::{DebtMarker, TechDebtCounts};
use once_cell::sync::Lazy;
use regex::Regex;

static MARKER_PATTERNS: Lazy<Vec<(DebtMarker, Regex)>> = Lazy::new(|| {
    DebtMarker::ALL
        .iter()
        .filter_map(|marker| {
            Regex::new(&format!(r"(?i)\b{}\b", marker.label()))
                .ok()
                .map(|re| (*marker, re))
        })
        .collect()
});

/// Counts debt-marker tags appearing in `#` comments.
///
/// Only the text after the first `#` of a line is searched. Each whole-word,
/// case-insensitive occurrence counts, so `# TODO: todo` adds two.
#[derive(Debug, Default, Clone, Copy)]
pub struct TechDebtScanner;

impl TechDebtScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, content: &str) -> TechDebtCounts {
        find_debt_markers(content)
    }
}

pub fn find_debt_markers(content: &str) -> TechDebtCounts {
    let mut counts = TechDebtCounts::default();

    for line in content.split('\n') {
        let Some(hash) = line.find('#') else {
            continue;
        };
        let comment = &line[hash + 1..];

        for (marker, pattern) in MARKER_PATTERNS.iter() {
            let found = pattern.find_iter(comment).count();
            if found > 0 {
                counts.add(*marker, found);
            }
        }
    }

    counts
}
