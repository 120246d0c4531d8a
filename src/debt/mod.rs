//! Technical-debt marker detection.

pub mod markers;

pub use markers::{find_debt_markers, TechDebtScanner};
