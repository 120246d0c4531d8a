//! Raw size metrics for Python source.
//!
//! # Line Counting Rules
//!
//! - **loc**: physical lines
//! - **blank**: lines containing only whitespace
//! - **comments**: lines holding a `#` comment, including inline comments
//! - **single_comments**: lines holding nothing but a comment
//! - **multi**: lines of standalone string statements (docstrings)
//! - **sloc**: everything else, so `loc == sloc + blank + multi + single_comments`
//! - **lloc**: logical lines, i.e. statements (`x = 1; y = 2` is two), clause
//!   headers such as `else:` and decorators
//!
//! Comments and strings come from the syntax tree, so a `#` inside a string
//! literal is never mistaken for a comment.

use crate::analyzers::python::{starts_logical_line, ParsedModule};
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// Line counts of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawMetrics {
    pub loc: usize,
    pub sloc: usize,
    pub lloc: usize,
    pub comments: usize,
    pub multi: usize,
    pub blank: usize,
    pub single_comments: usize,
}

/// Line type classification for LOC counting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineType {
    Blank,
    Comment,
    Docstring,
    Code,
}

pub fn calculate_raw_metrics(module: &ParsedModule) -> RawMetrics {
    let lines: Vec<&str> = module.source().lines().collect();
    let mut comment_rows = vec![false; lines.len()];
    let mut docstring_rows = vec![false; lines.len()];
    let mut lloc = 0;

    let mut stack = vec![module.root()];
    while let Some(node) = stack.pop() {
        if starts_logical_line(node) {
            lloc += 1;
        }
        match node.kind() {
            "comment" => mark_rows(&mut comment_rows, node),
            "expression_statement" if is_standalone_string(node) => {
                mark_rows(&mut docstring_rows, node);
                continue;
            }
            _ => {}
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }

    let mut metrics = RawMetrics {
        loc: lines.len(),
        lloc,
        comments: comment_rows.iter().filter(|c| **c).count(),
        ..RawMetrics::default()
    };

    for (row, line) in lines.iter().enumerate() {
        match classify_line(line.trim(), comment_rows[row], docstring_rows[row]) {
            LineType::Blank => metrics.blank += 1,
            LineType::Comment => metrics.single_comments += 1,
            LineType::Docstring => metrics.multi += 1,
            LineType::Code => metrics.sloc += 1,
        }
    }

    metrics
}

fn classify_line(trimmed: &str, has_comment: bool, in_docstring: bool) -> LineType {
    if in_docstring {
        return LineType::Docstring;
    }
    if trimmed.is_empty() {
        return LineType::Blank;
    }
    if has_comment && trimmed.starts_with('#') {
        return LineType::Comment;
    }
    LineType::Code
}

fn is_standalone_string(node: Node) -> bool {
    node.named_child_count() == 1
        && node
            .named_child(0)
            .is_some_and(|child| matches!(child.kind(), "string" | "concatenated_string"))
}

fn mark_rows(rows: &mut [bool], node: Node) {
    let start = node.start_position().row;
    let end = node.end_position().row;
    for row in start..=end {
        if let Some(slot) = rows.get_mut(row) {
            *slot = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python::{ParseOutcome, PythonParser};
    use indoc::indoc;

    fn raw(source: &str) -> RawMetrics {
        match PythonParser::new().unwrap().classify(source) {
            ParseOutcome::Modern(module) => calculate_raw_metrics(&module),
            other => panic!("expected modern parse, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_content() {
        let source = indoc! {r#"
            """Module doc."""
            # comment
            import os

            def f():  # inline
                return 1
        "#};
        let metrics = raw(source);
        assert_eq!(metrics.loc, 6);
        assert_eq!(metrics.blank, 1);
        assert_eq!(metrics.multi, 1);
        assert_eq!(metrics.single_comments, 1);
        assert_eq!(metrics.comments, 2);
        assert_eq!(metrics.sloc, 3);
    }

    #[test]
    fn test_multiline_docstring() {
        let source = indoc! {r#"
            def f():
                """Summary.

                Details.
                """
                return 1
        "#};
        let metrics = raw(source);
        assert_eq!(metrics.multi, 4);
        assert_eq!(metrics.sloc, 2);
        assert_eq!(metrics.blank, 0);
    }

    #[test]
    fn test_hash_inside_string_is_code() {
        let source = "x = '# not a comment'\ny = 2\n";
        let metrics = raw(source);
        assert_eq!(metrics.comments, 0);
        assert_eq!(metrics.sloc, 2);
    }

    #[test]
    fn test_assigned_multiline_string_is_code() {
        let source = "QUERY = \"\"\"\n# select\n\"\"\"\n";
        let metrics = raw(source);
        assert_eq!(metrics.multi, 0);
        assert_eq!(metrics.comments, 0);
        assert_eq!(metrics.sloc, 3);
    }

    #[test]
    fn test_loc_invariant() {
        let source = indoc! {r#"
            # header

            class A:
                """Doc."""

                x = 1  # inline
        "#};
        let m = raw(source);
        assert_eq!(m.loc, m.sloc + m.blank + m.multi + m.single_comments);
    }

    #[test]
    fn test_logical_lines() {
        let source = indoc! {r#"
            @decorate
            def f(x):
                """Doc."""
                a = 1; b = 2
                if x: return a
                else:
                    return b
        "#};
        let metrics = raw(source);
        // decorator, def, docstring, a, b, if, return, else, return
        assert_eq!(metrics.lloc, 9);
        assert_eq!(metrics.sloc, 6);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(raw(""), RawMetrics::default());
    }
}
