//! Maintainability index.
//!
//! Uses the normalized SEI formula with the comment term:
//!
//! ```text
//! MI = max(0, (171 - 5.2 ln V - 0.23 G - 16.2 ln L + 50 sin(sqrt(2.46 rad(C)))) * 100 / 171)
//! ```
//!
//! where `V` is the Halstead volume, `G` the total cyclomatic complexity,
//! `L` the logical lines of code and `C` the comment percentage of source
//! lines. Docstring lines count as comments.

use super::raw::RawMetrics;

/// Comment percentage relative to source lines, 0 without source lines
pub fn comment_percentage(raw: &RawMetrics) -> f64 {
    if raw.sloc == 0 {
        return 0.0;
    }
    (raw.comments + raw.multi) as f64 * 100.0 / raw.sloc as f64
}

/// Maintainability index in `0.0..=100.0`
///
/// Files with no measurable volume or no logical lines score 100.
pub fn maintainability_index(
    halstead_volume: f64,
    total_complexity: u32,
    lloc: usize,
    comment_percentage: f64,
) -> f64 {
    if halstead_volume <= 0.0 || lloc == 0 {
        return 100.0;
    }

    let volume_scale = halstead_volume.ln();
    let lines_scale = (lloc as f64).ln();
    let comments_scale = (2.46 * comment_percentage.to_radians()).sqrt();

    let unnormalized = 171.0 - 5.2 * volume_scale - 0.23 * f64::from(total_complexity)
        - 16.2 * lines_scale
        + 50.0 * comments_scale.sin();

    (unnormalized * 100.0 / 171.0).clamp(0.0, 100.0)
}
