//! Compatibility conversion of legacy (Python 2) source.
//!
//! The converter parses with the tolerant grammar, rewrites every legacy
//! construct an enabled fixer knows about, and re-parses until no fixable
//! construct is left. Text that does not parse even under the tolerant
//! grammar yields no output.

pub mod fixers;

use crate::analyzers::python::{legacy_construct, LegacyConstruct, PythonParser};
use anyhow::Result;
use fixers::{apply_edits, rewrite, Edit};
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

const MAX_PASSES: usize = 16;

/// One family of syntax rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixer {
    Print,
    Exec,
    Except,
    Ne,
    Numeric,
    Raise,
    Repr,
    Unicode,
}

impl Fixer {
    pub const ALL: [Fixer; 8] = [
        Fixer::Print,
        Fixer::Exec,
        Fixer::Except,
        Fixer::Ne,
        Fixer::Numeric,
        Fixer::Raise,
        Fixer::Repr,
        Fixer::Unicode,
    ];

    /// The fixer that rewrites `construct`, if any. Tuple parameters have none.
    pub fn for_construct(construct: LegacyConstruct) -> Option<Self> {
        match construct {
            LegacyConstruct::PrintStatement => Some(Fixer::Print),
            LegacyConstruct::ExecStatement => Some(Fixer::Exec),
            LegacyConstruct::ExceptComma => Some(Fixer::Except),
            LegacyConstruct::NotEqualOperator => Some(Fixer::Ne),
            LegacyConstruct::LongSuffix | LegacyConstruct::LegacyOctal => Some(Fixer::Numeric),
            LegacyConstruct::RaiseComma => Some(Fixer::Raise),
            LegacyConstruct::Backtick => Some(Fixer::Repr),
            LegacyConstruct::UnicodeRawPrefix => Some(Fixer::Unicode),
            LegacyConstruct::TupleParameter => None,
        }
    }
}

/// The fixed set of rewrites a converter applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerSet {
    enabled: Vec<Fixer>,
}

impl FixerSet {
    pub fn all() -> Self {
        Self {
            enabled: Fixer::ALL.to_vec(),
        }
    }

    pub fn only(fixers: impl IntoIterator<Item = Fixer>) -> Self {
        let mut enabled: Vec<Fixer> = Vec::new();
        for fixer in fixers {
            if !enabled.contains(&fixer) {
                enabled.push(fixer);
            }
        }
        Self { enabled }
    }

    pub fn contains(&self, fixer: Fixer) -> bool {
        self.enabled.contains(&fixer)
    }
}

impl Default for FixerSet {
    fn default() -> Self {
        Self::all()
    }
}

pub struct CompatibilityConverter {
    parser: PythonParser,
    fixers: FixerSet,
}

impl CompatibilityConverter {
    pub fn new(fixers: FixerSet) -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
            fixers,
        })
    }

    /// Rewrite legacy source into the modern grammar.
    ///
    /// Returns `None` when the text is not valid under the legacy grammar
    /// either.
    pub fn convert(&mut self, source: &str) -> Option<String> {
        if source.contains('\0') {
            return None;
        }

        let mut text = source.to_string();
        for pass in 0..MAX_PASSES {
            let tree = self.parser.parse_tree(&text)?;
            let root = tree.root_node();
            if root.has_error() {
                if pass == 0 {
                    return None;
                }
                log::debug!("Conversion pass {} left syntax errors", pass);
                return Some(text);
            }

            let edits = collect_edits(root, text.as_bytes(), &self.fixers);
            if edits.is_empty() {
                return Some(text);
            }
            text = apply_edits(&text, edits);
        }

        Some(text)
    }
}

fn collect_edits(root: Node, source: &[u8], fixers: &FixerSet) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let rewritten = legacy_construct(node, source)
            .filter(|construct| {
                Fixer::for_construct(*construct).is_some_and(|f| fixers.contains(f))
            })
            .and_then(|construct| rewrite(construct, node, source));

        let descend = match rewritten {
            Some(r) => {
                edits.push(r.edit);
                r.descend
            }
            None => true,
        };

        if descend {
            let mut cursor = node.walk();
            stack.extend(node.children(&mut cursor));
        }
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(source: &str) -> Option<String> {
        CompatibilityConverter::new(FixerSet::all())
            .unwrap()
            .convert(source)
    }

    #[test]
    fn test_print_statement() {
        assert_eq!(
            convert("print \"hello\"\n").as_deref(),
            Some("print(\"hello\")\n")
        );
    }

    #[test]
    fn test_print_multiple_arguments() {
        assert_eq!(
            convert("print a, b\n").as_deref(),
            Some("print(a, b)\n")
        );
    }

    #[test]
    fn test_print_inside_function() {
        let converted = convert("def f(x):\n    print x\n    return x\n").unwrap();
        assert_eq!(converted, "def f(x):\n    print(x)\n    return x\n");
    }

    #[test]
    fn test_modern_source_is_unchanged() {
        let source = "def f(x):\n    return x != 1\n";
        assert_eq!(convert(source).as_deref(), Some(source));
    }

    #[test]
    fn test_unparseable_source_yields_nothing() {
        assert_eq!(convert("def f(:\n"), None);
        assert_eq!(convert("x = 1\0"), None);
    }

    #[test]
    fn test_backtick_becomes_repr() {
        assert_eq!(convert("x = `y`\n").as_deref(), Some("x = repr(y)\n"));
        assert_eq!(
            convert("s = `a + b` + 'x'\n").as_deref(),
            Some("s = repr(a + b) + 'x'\n")
        );
    }

    #[test]
    fn test_unicode_raw_prefix_drops_unicode() {
        assert_eq!(convert("s = ur'abc'\n").as_deref(), Some("s = r'abc'\n"));
        assert_eq!(convert("s = UR\"a\"\n").as_deref(), Some("s = R\"a\"\n"));
    }

    #[test]
    fn test_tuple_parameter_is_left_alone() {
        let source = "def f(a, (b, c)):\n    print a\n";
        assert_eq!(
            convert(source).as_deref(),
            Some("def f(a, (b, c)):\n    print(a)\n")
        );
    }

    #[test]
    fn test_disabled_fixer_leaves_construct() {
        let mut converter =
            CompatibilityConverter::new(FixerSet::only([Fixer::Numeric])).unwrap();
        let converted = converter.convert("print \"x\"\n").unwrap();
        assert_eq!(converted, "print \"x\"\n");
    }

    #[test]
    fn test_fixer_names_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            fixers: Vec<Fixer>,
        }
        let wrapper: Wrapper = toml::from_str("fixers = [\"print\", \"ne\"]").unwrap();
        assert_eq!(wrapper.fixers, vec![Fixer::Print, Fixer::Ne]);
    }
}
