//! Metrics calculation module
//!
//! Size, Halstead and maintainability metrics computed from a parsed module.

pub mod halstead;
pub mod maintainability;
pub mod raw;

pub use halstead::{calculate_halstead, HalsteadMetrics};
pub use maintainability::{comment_percentage, maintainability_index};
pub use raw::{calculate_raw_metrics, RawMetrics};
