pub mod engine;
pub mod python;

pub use engine::{compute_file_metrics, FileMetricsEngine};
pub use python::{LegacyConstruct, ParseOutcome, ParsedModule, PythonParser, SyntaxFailure};
