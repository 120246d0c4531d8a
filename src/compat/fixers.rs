//! Syntax-only rewrites from Python 2 constructs to Python 3.
//!
//! Each fixer looks at a single legacy node and produces a byte-range edit.
//! Edits never overlap: when an edit rebuilds a node from its children's
//! text, the walker does not descend into that node, and any legacy
//! constructs nested inside are picked up by the next conversion pass.

use crate::analyzers::python::{is_legacy_octal, LegacyConstruct};
use tree_sitter::Node;

/// Replace `source[start..end]` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    fn replace(node: Node, replacement: impl Into<String>) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
            replacement: replacement.into(),
        }
    }
}

/// A fixer's result: the edit, and whether the node's children may still be visited
pub struct Rewrite {
    pub edit: Edit,
    pub descend: bool,
}

pub fn rewrite(construct: LegacyConstruct, node: Node, source: &[u8]) -> Option<Rewrite> {
    match construct {
        LegacyConstruct::PrintStatement => Some(opaque(fix_print(node, source))),
        LegacyConstruct::ExecStatement => fix_exec(node, source).map(opaque),
        LegacyConstruct::ExceptComma => fix_except(node).map(|edit| Rewrite {
            edit,
            descend: true,
        }),
        LegacyConstruct::NotEqualOperator => Some(opaque(Edit::replace(node, "!="))),
        LegacyConstruct::LongSuffix | LegacyConstruct::LegacyOctal => {
            Some(opaque(fix_integer(node, source)))
        }
        LegacyConstruct::RaiseComma => fix_raise(node, source).map(opaque),
        LegacyConstruct::Backtick => fix_backtick(node, source).map(opaque),
        LegacyConstruct::UnicodeRawPrefix => fix_string_prefix(node, source).map(opaque),
        LegacyConstruct::TupleParameter => None,
    }
}

fn opaque(edit: Edit) -> Rewrite {
    Rewrite {
        edit,
        descend: false,
    }
}

fn text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or_default()
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// `print a, b,` → `print(a, b, end=" ")`, `print >>f, a` → `print(a, file=f)`
fn fix_print(node: Node, source: &[u8]) -> Edit {
    let parts = children(node);
    let mut args: Vec<String> = Vec::new();
    let mut target = None;

    for child in &parts {
        match child.kind() {
            "print" | "," => {}
            "chevron" => target = child.named_child(0).map(|t| text(t, source).to_string()),
            _ if child.is_named() => args.push(text(*child, source).to_string()),
            _ => {}
        }
    }

    let trailing_comma = parts.last().is_some_and(|last| last.kind() == ",");
    if trailing_comma {
        args.push("end=\" \"".to_string());
    }
    if let Some(target) = target {
        args.push(format!("file={target}"));
    }

    Edit::replace(node, format!("print({})", args.join(", ")))
}

/// `exec code in ns` → `exec(code, ns)`
fn fix_exec(node: Node, source: &[u8]) -> Option<Edit> {
    let args: Vec<&str> = children(node)
        .into_iter()
        .filter(|child| child.is_named())
        .map(|child| text(child, source))
        .collect();
    if args.is_empty() {
        return None;
    }
    Some(Edit::replace(node, format!("exec({})", args.join(", "))))
}

/// `except E, e:` → `except E as e:`
fn fix_except(node: Node) -> Option<Edit> {
    let comma = children(node).into_iter().find(|child| child.kind() == ",")?;
    let before = comma.prev_named_sibling()?;
    let after = comma.next_named_sibling()?;
    Some(Edit {
        start: before.end_byte(),
        end: after.start_byte(),
        replacement: " as ".to_string(),
    })
}

/// `10L` → `10`, `0777` → `0o777`
fn fix_integer(node: Node, source: &[u8]) -> Edit {
    let literal = text(node, source).trim_end_matches(['l', 'L']);
    let fixed = if is_legacy_octal(literal) {
        format!("0o{}", literal.trim_start_matches('0'))
    } else {
        literal.to_string()
    };
    Edit::replace(node, fixed)
}

/// `raise E, V` → `raise E(V)`, `raise E, V, T` → `raise E(V).with_traceback(T)`
fn fix_raise(node: Node, source: &[u8]) -> Option<Edit> {
    let list = children(node)
        .into_iter()
        .find(|child| child.kind() == "expression_list")?;
    let items: Vec<&str> = children(list)
        .into_iter()
        .filter(|child| child.is_named())
        .map(|child| text(child, source))
        .collect();

    let replacement = match items.as_slice() {
        [exc] => exc.to_string(),
        [exc, value] => format!("{exc}({value})"),
        [exc, value, traceback] => format!("{exc}({value}).with_traceback({traceback})"),
        _ => return None,
    };
    Some(Edit::replace(list, replacement))
}

/// `` `x` `` → `repr(x)`
fn fix_backtick(node: Node, source: &[u8]) -> Option<Edit> {
    let start = node.child(0)?;
    let end = node.child(node.child_count().checked_sub(1)?)?;
    if end.kind() != "string_end" {
        return None;
    }
    let inner = source.get(start.end_byte()..end.start_byte())?;
    let expression = std::str::from_utf8(inner).ok()?.trim();
    Some(Edit::replace(node, format!("repr({expression})")))
}

/// `ur'x'` → `r'x'`
fn fix_string_prefix(node: Node, source: &[u8]) -> Option<Edit> {
    let start = node.child(0).filter(|child| child.kind() == "string_start")?;
    let delimiter: String = text(start, source)
        .chars()
        .filter(|c| !matches!(c, 'u' | 'U'))
        .collect();
    Some(Edit::replace(start, delimiter))
}

/// Apply non-overlapping edits to `source`
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut result = source.to_string();
    for edit in edits {
        if edit.start <= edit.end
            && edit.end <= result.len()
            && result.is_char_boundary(edit.start)
            && result.is_char_boundary(edit.end)
        {
            result.replace_range(edit.start..edit.end, &edit.replacement);
        }
    }
    result
}
