//! Python parsing and grammar classification.
//!
//! tree-sitter-python is tolerant: besides Python 3 it accepts several
//! Python 2 statements (`print x`, `exec code in ns`, `except E, e:`, `<>`,
//! `10L`, backtick repr, `ur''` strings, tuple parameters, ...). A parse only
//! counts as *modern* when the tree has no ERROR or MISSING nodes, none of
//! those legacy constructs, and indentation that does not mix tabs and spaces
//! ambiguously.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser, Tree};

/// Python 2 constructs the tolerant grammar accepts but Python 3 rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyConstruct {
    /// `print x, y`
    PrintStatement,
    /// `exec code in ns`
    ExecStatement,
    /// `except E, e:`
    ExceptComma,
    /// `a <> b`
    NotEqualOperator,
    /// `10L`
    LongSuffix,
    /// `0777`
    LegacyOctal,
    /// `raise E, V`
    RaiseComma,
    /// `` `x` ``
    Backtick,
    /// `ur'...'`
    UnicodeRawPrefix,
    /// `def f(a, (b, c)):`
    TupleParameter,
}

impl LegacyConstruct {
    pub fn describe(&self) -> &'static str {
        match self {
            LegacyConstruct::PrintStatement => "print statement",
            LegacyConstruct::ExecStatement => "exec statement",
            LegacyConstruct::ExceptComma => "comma in except clause",
            LegacyConstruct::NotEqualOperator => "'<>' operator",
            LegacyConstruct::LongSuffix => "long integer suffix",
            LegacyConstruct::LegacyOctal => "legacy octal literal",
            LegacyConstruct::RaiseComma => "comma in raise statement",
            LegacyConstruct::Backtick => "backtick repr",
            LegacyConstruct::UnicodeRawPrefix => "combined unicode string prefix",
            LegacyConstruct::TupleParameter => "tuple parameter unpacking",
        }
    }
}

/// Identify a legacy construct rooted at `node`
pub fn legacy_construct(node: Node, source: &[u8]) -> Option<LegacyConstruct> {
    match node.kind() {
        "print_statement" => Some(LegacyConstruct::PrintStatement),
        "exec_statement" => Some(LegacyConstruct::ExecStatement),
        "except_clause" if has_direct_child(node, ",") => Some(LegacyConstruct::ExceptComma),
        "<>" if !node.is_named() => Some(LegacyConstruct::NotEqualOperator),
        "raise_statement" if has_direct_child(node, "expression_list") => {
            Some(LegacyConstruct::RaiseComma)
        }
        "string" => string_prefix_construct(node, source),
        "tuple_pattern" if is_parameter(node) => Some(LegacyConstruct::TupleParameter),
        "integer" => {
            let text = node.utf8_text(source).unwrap_or_default();
            if text.ends_with(['l', 'L']) {
                Some(LegacyConstruct::LongSuffix)
            } else if is_legacy_octal(text) {
                Some(LegacyConstruct::LegacyOctal)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn string_prefix_construct(node: Node, source: &[u8]) -> Option<LegacyConstruct> {
    let start = node.child(0).filter(|child| child.kind() == "string_start")?;
    let delimiter = start.utf8_text(source).unwrap_or_default();
    if delimiter.ends_with('`') {
        return Some(LegacyConstruct::Backtick);
    }

    let prefix = delimiter.trim_end_matches(['\'', '"']);
    let has_unicode = prefix.contains(['u', 'U']);
    (has_unicode && prefix.len() > 1).then_some(LegacyConstruct::UnicodeRawPrefix)
}

/// A `tuple_pattern` in a parameter list, bare or with a default
fn is_parameter(node: Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "parameters" | "lambda_parameters" => true,
        "default_parameter" => parent
            .parent()
            .is_some_and(|p| matches!(p.kind(), "parameters" | "lambda_parameters")),
        _ => false,
    }
}

pub fn is_legacy_octal(text: &str) -> bool {
    text.len() > 1
        && text.starts_with('0')
        && text.bytes().all(|b| b.is_ascii_digit())
        && text.bytes().any(|b| b != b'0')
}

fn has_direct_child(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// Why a text was rejected by the modern grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFailure {
    /// 1-based line of the first offending node
    pub line: usize,
    pub message: String,
}

/// A source text together with its modern-grammar syntax tree
#[derive(Debug, Clone)]
pub struct ParsedModule {
    source: String,
    tree: Tree,
}

impl ParsedModule {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}

/// Result of classifying a text against the modern grammar
#[derive(Debug)]
pub enum ParseOutcome {
    /// Valid modern Python
    Modern(ParsedModule),
    /// A grammar mismatch: worth one compatibility conversion attempt
    NeedsFallback(SyntaxFailure),
    /// Not a grammar problem; retrying cannot help
    Failed(String),
}

pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .context("Failed to set Python language")?;
        Ok(Self { parser })
    }

    /// Parse with the tolerant grammar, returning the raw tree
    pub fn parse_tree(&mut self, content: &str) -> Option<Tree> {
        self.parser.parse(content, None)
    }

    /// Parse and classify `content` against the modern grammar
    pub fn classify(&mut self, content: &str) -> ParseOutcome {
        if content.contains('\0') {
            return ParseOutcome::Failed("source contains NUL bytes".to_string());
        }

        let Some(tree) = self.parse_tree(content) else {
            return ParseOutcome::Failed("parser produced no tree".to_string());
        };

        let root = tree.root_node();
        if root.has_error() {
            return ParseOutcome::NeedsFallback(first_error(root));
        }

        if let Some(failure) = first_legacy_construct(root, content.as_bytes()) {
            return ParseOutcome::NeedsFallback(failure);
        }

        if let Some(failure) = inconsistent_indentation(root, content) {
            return ParseOutcome::NeedsFallback(failure);
        }

        ParseOutcome::Modern(ParsedModule {
            source: content.to_string(),
            tree,
        })
    }
}

fn first_error(root: Node) -> SyntaxFailure {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let message = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return SyntaxFailure {
                line: node.start_position().row + 1,
                message,
            };
        }
        push_children_in_order(node, &mut stack, |child| child.has_error());
    }

    SyntaxFailure {
        line: 1,
        message: "invalid syntax".to_string(),
    }
}

fn first_legacy_construct(root: Node, source: &[u8]) -> Option<SyntaxFailure> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(construct) = legacy_construct(node, source) {
            return Some(SyntaxFailure {
                line: node.start_position().row + 1,
                message: construct.describe().to_string(),
            });
        }
        push_children_in_order(node, &mut stack, |_| true);
    }
    None
}

const TAB_SIZE: usize = 8;

/// Nodes outside the statement list that open a logical line of their own
const CLAUSE_KINDS: &[&str] = &[
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "decorator",
];

/// Whether `node` opens a logical line: a statement directly inside a module
/// or block (each `;`-separated statement counts), a clause header, or a
/// decorator
pub fn starts_logical_line(node: Node) -> bool {
    if CLAUSE_KINDS.contains(&node.kind()) {
        return true;
    }
    node.parent().is_some_and(|parent| {
        matches!(parent.kind(), "module" | "block") && node.is_named() && node.kind() != "comment"
    })
}

/// Rows that begin a logical line, in ascending order
fn logical_line_rows(root: Node) -> BTreeSet<usize> {
    let mut rows = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if starts_logical_line(node) {
            rows.insert(node.start_position().row);
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    rows
}

fn indent_width(indent: &str, tab_size: usize) -> usize {
    indent.chars().fold(0, |col, ch| match ch {
        '\t' => (col / tab_size + 1) * tab_size,
        '\x0c' => 0,
        _ => col + 1,
    })
}

/// Find the first line whose indentation is ambiguous between tab widths.
///
/// Every logical line is measured twice, with tabs as 8 columns and as 1.
/// Both measures must agree on whether the line indents, dedents or stays
/// level relative to the enclosing blocks.
fn inconsistent_indentation(root: Node, content: &str) -> Option<SyntaxFailure> {
    let lines: Vec<&str> = content.lines().collect();
    let mut levels: Vec<(usize, usize)> = vec![(0, 0)];

    for row in logical_line_rows(root) {
        let Some(line) = lines.get(row) else {
            continue;
        };
        let body = line.trim_start_matches([' ', '\t', '\x0c']);
        let indent = &line[..line.len() - body.len()];
        let col = indent_width(indent, TAB_SIZE);
        let alt = indent_width(indent, 1);

        while levels.len() > 1 && levels.last().is_some_and(|&(top, _)| col < top) {
            levels.pop();
        }
        let (top_col, top_alt) = levels.last().copied().unwrap_or((0, 0));

        let consistent = if col > top_col {
            alt > top_alt
        } else {
            alt == top_alt
        };
        if !consistent {
            return Some(SyntaxFailure {
                line: row + 1,
                message: "inconsistent use of tabs and spaces in indentation".to_string(),
            });
        }
        if col > top_col {
            levels.push((col, alt));
        }
    }
    None
}

/// Push children so that popping visits them first-to-last
fn push_children_in_order<'t>(
    node: Node<'t>,
    stack: &mut Vec<Node<'t>>,
    keep: impl Fn(&Node<'t>) -> bool,
) {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).filter(|c| keep(c)).collect();
    stack.extend(children.into_iter().rev());
}
