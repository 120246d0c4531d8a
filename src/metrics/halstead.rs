use crate::analyzers::python::ParsedModule;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tree_sitter::Node;

/// Halstead operator/operand counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    pub distinct_operators: usize,
    pub distinct_operands: usize,
    pub total_operators: usize,
    pub total_operands: usize,
}

impl HalsteadMetrics {
    pub fn vocabulary(&self) -> usize {
        self.distinct_operators + self.distinct_operands
    }

    pub fn length(&self) -> usize {
        self.total_operators + self.total_operands
    }

    /// `length * log2(vocabulary)`, 0 for an empty vocabulary
    pub fn volume(&self) -> f64 {
        let vocabulary = self.vocabulary();
        if vocabulary == 0 {
            return 0.0;
        }
        self.length() as f64 * (vocabulary as f64).log2()
    }
}

#[derive(Default)]
struct HalsteadCollector<'s> {
    operators: HashSet<&'s str>,
    operands: HashSet<&'s str>,
    total_operators: usize,
    total_operands: usize,
}

impl<'s> HalsteadCollector<'s> {
    fn operator(&mut self, op: &'s str) {
        self.operators.insert(op);
        self.total_operators += 1;
    }

    fn operand(&mut self, operand: &'s str) {
        self.operands.insert(operand);
        self.total_operands += 1;
    }

    fn finish(self) -> HalsteadMetrics {
        HalsteadMetrics {
            distinct_operators: self.operators.len(),
            distinct_operands: self.operands.len(),
            total_operators: self.total_operators,
            total_operands: self.total_operands,
        }
    }
}

/// Count operators and operands of arithmetic, boolean, comparison and
/// augmented-assignment expressions
pub fn calculate_halstead(module: &ParsedModule) -> HalsteadMetrics {
    let mut collector = HalsteadCollector::default();
    let mut stack = vec![module.root()];

    while let Some(node) = stack.pop() {
        visit_expression(node, module, &mut collector);
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }

    collector.finish()
}

fn visit_expression<'s>(node: Node, module: &'s ParsedModule, collector: &mut HalsteadCollector<'s>) {
    match node.kind() {
        "binary_operator" | "boolean_operator" | "augmented_assignment" => {
            if let Some(op) = node.child_by_field_name("operator") {
                collector.operator(module.text(op));
            }
            for field in ["left", "right"] {
                if let Some(operand) = node.child_by_field_name(field) {
                    collector.operand(module.text(operand));
                }
            }
        }
        "unary_operator" | "not_operator" => {
            match node.child_by_field_name("operator") {
                Some(op) => collector.operator(module.text(op)),
                None => collector.operator("not"),
            }
            if let Some(operand) = node.child_by_field_name("argument") {
                collector.operand(module.text(operand));
            }
        }
        "comparison_operator" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "comment" {
                    continue;
                }
                if child.is_named() {
                    collector.operand(module.text(child));
                } else {
                    collector.operator(child.kind());
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python::{ParseOutcome, PythonParser};

    fn halstead(source: &str) -> HalsteadMetrics {
        match PythonParser::new().unwrap().classify(source) {
            ParseOutcome::Modern(module) => calculate_halstead(&module),
            other => panic!("expected modern parse, got {other:?}"),
        }
    }

    #[test]
    fn test_no_expressions() {
        let metrics = halstead("import os\n");
        assert_eq!(metrics, HalsteadMetrics::default());
        assert_eq!(metrics.volume(), 0.0);
    }

    #[test]
    fn test_binary_and_comparison() {
        let metrics = halstead("x = a + b\ny = a < b\n");
        assert_eq!(metrics.total_operators, 2);
        assert_eq!(metrics.distinct_operators, 2);
        assert_eq!(metrics.total_operands, 4);
        assert_eq!(metrics.distinct_operands, 2);
        // length 6, vocabulary 4
        assert!((metrics.volume() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_and_augmented_assignment() {
        let metrics = halstead("x += 1\ny = not x\n");
        assert_eq!(metrics.total_operators, 2);
        assert_eq!(metrics.total_operands, 3);
    }
}
