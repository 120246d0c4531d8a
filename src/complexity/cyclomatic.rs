use crate::analyzers::python::ParsedModule;
use tree_sitter::Node;

/// Cyclomatic complexity of one function or method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionComplexity {
    pub name: String,
    pub line: usize,
    pub complexity: u32,
}

/// Complexity of every function-level block, in pre-order source order.
///
/// Nested functions are reported as blocks of their own and do not add to
/// the enclosing function.
pub fn calculate_function_complexities(module: &ParsedModule) -> Vec<FunctionComplexity> {
    let mut functions = Vec::new();
    let mut stack = vec![module.root()];

    while let Some(node) = stack.pop() {
        if node.kind() == "function_definition" {
            let name = node
                .child_by_field_name("name")
                .map(|n| module.text(n).to_string())
                .unwrap_or_else(|| "<anonymous>".to_string());
            functions.push(FunctionComplexity {
                name,
                line: node.start_position().row + 1,
                complexity: calculate_cyclomatic(node),
            });
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    functions
}

/// Complexity of a single `function_definition` node
pub fn calculate_cyclomatic(function: Node) -> u32 {
    1 + function
        .child_by_field_name("body")
        .map(decision_points)
        .unwrap_or(0)
}

/// Complexity of the whole module: every function plus the decision points
/// found outside any function
pub fn total_complexity(module: &ParsedModule, functions: &[FunctionComplexity]) -> u32 {
    let in_functions: u32 = functions.iter().map(|f| f.complexity).sum();
    in_functions + decision_points(module.root())
}

fn decision_points(root: Node) -> u32 {
    let mut complexity = 0;
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        complexity += node_complexity(node);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "function_definition" {
                stack.push(child);
            }
        }
    }

    complexity
}

fn node_complexity(node: Node) -> u32 {
    match node.kind() {
        "if_statement" | "elif_clause" | "conditional_expression" => 1,
        "for_statement" | "while_statement" => 1 + has_else(node),
        "try_statement" => has_else(node),
        "except_clause" | "except_group_clause" => 1,
        "with_statement" => 1,
        "boolean_operator" => 1,
        "for_in_clause" | "if_clause" => 1,
        "case_clause" => 1,
        "assert_statement" => 1,
        _ => 0,
    }
}

fn has_else(node: Node) -> u32 {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "else_clause");
    u32::from(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python::{ParseOutcome, PythonParser};
    use indoc::indoc;

    fn parse(source: &str) -> ParsedModule {
        match PythonParser::new().unwrap().classify(source) {
            ParseOutcome::Modern(module) => module,
            other => panic!("expected modern parse, got {other:?}"),
        }
    }

    fn complexities(source: &str) -> Vec<u32> {
        calculate_function_complexities(&parse(source))
            .into_iter()
            .map(|f| f.complexity)
            .collect()
    }

    #[test]
    fn test_straight_line_function() {
        assert_eq!(complexities("def f():\n    return 1\n"), vec![1]);
    }

    #[test]
    fn test_if_elif_else() {
        let source = indoc! {"
            def check(x, y):
                if x:
                    return 1
                elif y:
                    return 2
                else:
                    return 3
        "};
        assert_eq!(complexities(source), vec![3]);
    }

    #[test]
    fn test_loops_with_else_and_boolean_operators() {
        let source = indoc! {"
            def scan(items, a, b):
                for item in items:
                    if a and b or item:
                        break
                else:
                    pass
                while a:
                    a -= 1
        "};
        // 1 + for + for-else + if + and + or + while
        assert_eq!(complexities(source), vec![7]);
    }

    #[test]
    fn test_try_handlers_and_comprehension() {
        let source = indoc! {"
            def load(paths):
                try:
                    data = [p for p in paths if p]
                except ValueError:
                    data = []
                except KeyError:
                    data = None
                else:
                    pass
                return data
        "};
        // 1 + two handlers + try-else + comprehension for + comprehension if
        assert_eq!(complexities(source), vec![6]);
    }

    #[test]
    fn test_nested_function_is_separate_block() {
        let source = indoc! {"
            def outer(x):
                def inner(y):
                    if y:
                        return y
                    return 0
                if x:
                    return inner(x)
                return None
        "};
        let functions = calculate_function_complexities(&parse(source));
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
        assert_eq!(functions[0].complexity, 2);
        assert_eq!(functions[1].complexity, 2);
    }

    #[test]
    fn test_methods_are_blocks() {
        let source = indoc! {"
            class Thing:
                def a(self):
                    return 1

                def b(self, x):
                    return 1 if x else 2
        "};
        assert_eq!(complexities(source), vec![1, 2]);
    }

    #[test]
    fn test_assert_is_a_decision_point() {
        let source = indoc! {"
            def check(x):
                assert x
                assert x > 1, 'too small'
                return x
        "};
        assert_eq!(complexities(source), vec![3]);
    }

    #[test]
    fn test_total_complexity_includes_module_level() {
        let source = indoc! {"
            import sys

            if sys.argv:
                pass

            def f(x):
                if x:
                    return 1
                return 2
        "};
        let module = parse(source);
        let functions = calculate_function_complexities(&module);
        assert_eq!(total_complexity(&module, &functions), 3);
    }
}
