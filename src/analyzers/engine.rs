use super::python::{ParseOutcome, ParsedModule, PythonParser, SyntaxFailure};
use crate::compat::{CompatibilityConverter, FixerSet};
use crate::complexity::{calculate_function_complexities, total_complexity};
use crate::core::{FileMetrics, UnanalyzableFile};
use crate::metrics::{
    calculate_halstead, calculate_raw_metrics, comment_percentage, maintainability_index,
};
use anyhow::Result;

/// Computes per-file metrics with a two-stage parse.
///
/// Stage 1 analyzes the text as modern Python. Only a grammar mismatch
/// leads to stage 2, which converts the text once and analyzes the result.
/// Content problems (e.g. NUL bytes) fail immediately.
pub struct FileMetricsEngine {
    parser: PythonParser,
    converter: CompatibilityConverter,
}

impl FileMetricsEngine {
    pub fn new(fixers: FixerSet) -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
            converter: CompatibilityConverter::new(fixers)?,
        })
    }

    pub fn analyze(&mut self, source: &str) -> Result<FileMetrics, UnanalyzableFile> {
        match self.parser.classify(source) {
            ParseOutcome::Modern(module) => Ok(compute_file_metrics(&module, false)),
            ParseOutcome::NeedsFallback(failure) => self.analyze_converted(source, failure),
            ParseOutcome::Failed(reason) => Err(UnanalyzableFile::Content(reason)),
        }
    }

    fn analyze_converted(
        &mut self,
        source: &str,
        original: SyntaxFailure,
    ) -> Result<FileMetrics, UnanalyzableFile> {
        let Some(converted) = self.converter.convert(source) else {
            return Err(syntax_error(original));
        };

        match self.parser.classify(&converted) {
            ParseOutcome::Modern(module) => Ok(compute_file_metrics(&module, true)),
            ParseOutcome::NeedsFallback(failure) => Err(syntax_error(failure)),
            ParseOutcome::Failed(reason) => Err(UnanalyzableFile::Content(reason)),
        }
    }
}

fn syntax_error(failure: SyntaxFailure) -> UnanalyzableFile {
    UnanalyzableFile::Syntax {
        line: failure.line,
        message: failure.message,
    }
}

/// Maintainability, complexity and raw metrics of a modern-grammar module
pub fn compute_file_metrics(module: &ParsedModule, converted: bool) -> FileMetrics {
    let functions = calculate_function_complexities(module);
    let raw = calculate_raw_metrics(module);
    let halstead = calculate_halstead(module);

    let maintainability = maintainability_index(
        halstead.volume(),
        total_complexity(module, &functions),
        raw.lloc,
        comment_percentage(&raw),
    );

    FileMetrics {
        maintainability,
        complexities: functions.iter().map(|f| f.complexity).collect(),
        loc: raw.loc,
        sloc: raw.sloc,
        comments: raw.comments,
        multi: raw.multi,
        blank: raw.blank,
        halstead_volume: halstead.volume(),
        converted,
    }
}
