//! Common type definitions used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed vocabulary of technical-debt comment tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebtMarker {
    Todo,
    Fixme,
    Hack,
    Xxx,
    Bug,
}

impl DebtMarker {
    /// All markers, in reporting order
    pub const ALL: [DebtMarker; 5] = [
        DebtMarker::Todo,
        DebtMarker::Fixme,
        DebtMarker::Hack,
        DebtMarker::Xxx,
        DebtMarker::Bug,
    ];

    /// Label as it appears in source comments and in the output schema
    pub fn label(&self) -> &'static str {
        match self {
            DebtMarker::Todo => "TODO",
            DebtMarker::Fixme => "FIXME",
            DebtMarker::Hack => "HACK",
            DebtMarker::Xxx => "XXX",
            DebtMarker::Bug => "BUG",
        }
    }
}

impl fmt::Display for DebtMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Occurrence counts per debt marker
///
/// Serialized as an object keyed by the five marker labels, always in the
/// same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechDebtCounts {
    #[serde(rename = "TODO")]
    pub todo: usize,
    #[serde(rename = "FIXME")]
    pub fixme: usize,
    #[serde(rename = "HACK")]
    pub hack: usize,
    #[serde(rename = "XXX")]
    pub xxx: usize,
    #[serde(rename = "BUG")]
    pub bug: usize,
}

impl TechDebtCounts {
    pub fn get(&self, marker: DebtMarker) -> usize {
        match marker {
            DebtMarker::Todo => self.todo,
            DebtMarker::Fixme => self.fixme,
            DebtMarker::Hack => self.hack,
            DebtMarker::Xxx => self.xxx,
            DebtMarker::Bug => self.bug,
        }
    }

    pub fn add(&mut self, marker: DebtMarker, count: usize) {
        let slot = match marker {
            DebtMarker::Todo => &mut self.todo,
            DebtMarker::Fixme => &mut self.fixme,
            DebtMarker::Hack => &mut self.hack,
            DebtMarker::Xxx => &mut self.xxx,
            DebtMarker::Bug => &mut self.bug,
        };
        *slot += count;
    }

    /// Fold another file's counts into this total
    pub fn merge(&mut self, other: &TechDebtCounts) {
        for marker in DebtMarker::ALL {
            self.add(marker, other.get(marker));
        }
    }

    pub fn total(&self) -> usize {
        DebtMarker::ALL.iter().map(|m| self.get(*m)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DebtMarker, usize)> + '_ {
        DebtMarker::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

/// Metrics for a single analyzed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Maintainability index in `0.0..=100.0`
    pub maintainability: f64,
    /// Cyclomatic complexity of every function-level block, in source order
    pub complexities: Vec<u32>,
    pub loc: usize,
    pub sloc: usize,
    pub comments: usize,
    /// Lines belonging to standalone string statements (docstrings)
    pub multi: usize,
    pub blank: usize,
    pub halstead_volume: f64,
    /// Whether the metrics come from compatibility-converted text
    pub converted: bool,
}

/// Summary of one analyzed release of a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub library: String,
    pub version: String,
    pub avg_maintainability: f64,
    pub avg_complexity: f64,
    pub max_complexity: u32,
    pub total_loc: usize,
    pub total_sloc: usize,
    pub total_comments: usize,
    pub comment_ratio: f64,
    pub tech_debt_markers: TechDebtCounts,
    pub total_markers: usize,
    pub files_analyzed: usize,
    pub files_skipped: usize,
}

/// Round to two decimal places, the precision of every reported average.
///
/// Rounds the exact binary value with ties to even, so `0.125` gives `0.12`
/// and `2.675` (stored just below) gives `2.67`.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
