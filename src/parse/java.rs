//! Java parser - parses Java source code to expression trees

use crate::ast::*;
use crate::error::{Error, Result};
use crate::stack::ensure_sufficient_stack;
use sha2::{Digest, Sha256};
use tree_sitter::{Node, Parser};

use super::{collect_syntax_errors, node_span, node_text};

/// Expression kinds with structure worth inspecting. Bare names and literals
/// are never roots on their own.
const COMPOUND_EXPRESSION_KINDS: &[&str] = &[
    "assignment_expression",
    "binary_expression",
    "instanceof_expression",
    "lambda_expression",
    "ternary_expression",
    "update_expression",
    "unary_expression",
    "cast_expression",
    "switch_expression",
    "parenthesized_expression",
    "object_creation_expression",
    "array_creation_expression",
    "method_invocation",
    "method_reference",
    "field_access",
    "array_access",
];

pub fn parse_java(source: &str) -> Result<SourceUnit> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| Error::CodeParse(format!("Failed to set language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::CodeParse("Failed to parse source".into()))?;

    let root = tree.root_node();

    let mut roots = Vec::new();
    collect_roots(root, source, &mut roots);

    let mut syntax_errors = Vec::new();
    collect_syntax_errors(root, source, &mut syntax_errors);
    for error in &syntax_errors {
        tracing::warn!(
            line = error.span.start_line,
            col = error.span.start_col,
            text = %error.source_text,
            "{}",
            error.message
        );
    }

    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let source_hash = format!("sha256:{}", hex::encode(&hasher.finalize()[..8]));

    Ok(SourceUnit {
        language: Language::Java,
        roots,
        syntax_errors,
        source_hash,
    })
}

/// Find outermost expressions below `node`
fn collect_roots(node: Node, source: &str, roots: &mut Vec<Expr>) {
    ensure_sufficient_stack(|| collect_roots_at(node, source, roots))
}

fn collect_roots_at(node: Node, source: &str, roots: &mut Vec<Expr>) {
    if COMPOUND_EXPRESSION_KINDS.contains(&node.kind()) {
        roots.push(parse_java_expr(node, source));
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_roots(child, source, roots);
    }
}

/// Outermost expressions nested anywhere inside `node`, excluding `node`
fn nested_expressions(node: Node, source: &str) -> Vec<Expr> {
    let mut nested = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_roots(child, source, &mut nested);
    }
    nested
}

fn parse_java_expr(node: Node, source: &str) -> Expr {
    ensure_sufficient_stack(|| parse_java_node(node, source))
}

fn parse_java_node(node: Node, source: &str) -> Expr {
    let span = node_span(node);
    match node.kind() {
        "parenthesized_expression" => match first_named_child(node) {
            Some(inner) => Expr::Paren {
                inner: Box::new(parse_java_expr(inner, source)),
                span,
            },
            None => unknown(node, source),
        },
        "identifier" | "type_identifier" => Expr::Name {
            name: node_text(node, source).to_string(),
            span,
        },
        "this" => Expr::This {
            qualifier: None,
            span,
        },
        "super" => Expr::Super {
            qualifier: None,
            span,
        },
        "null_literal" => literal(node, source, LiteralKind::Null),
        "true" | "false" => literal(node, source, LiteralKind::Bool),
        "decimal_integer_literal"
        | "hex_integer_literal"
        | "octal_integer_literal"
        | "binary_integer_literal" => literal(node, source, LiteralKind::Int),
        "decimal_floating_point_literal" | "hex_floating_point_literal" => {
            literal(node, source, LiteralKind::Float)
        }
        "character_literal" => literal(node, source, LiteralKind::Char),
        "string_literal" | "text_block" => literal(node, source, LiteralKind::String),
        "field_access" => parse_field_access(node, source).unwrap_or_else(|| unknown(node, source)),
        "array_access" => {
            match (
                node.child_by_field_name("array"),
                node.child_by_field_name("index"),
            ) {
                (Some(array), Some(index)) => Expr::Index {
                    array: Box::new(parse_java_expr(array, source)),
                    index: Box::new(parse_java_expr(index, source)),
                    span,
                },
                _ => unknown(node, source),
            }
        }
        "method_invocation" => {
            parse_method_invocation(node, source).unwrap_or_else(|| unknown(node, source))
        }
        "object_creation_expression" => {
            let has_body = has_child_kind(node, "class_body");
            match (node.child_by_field_name("type"), has_body) {
                (Some(typ), false) => Expr::New {
                    class: node_text(typ, source).to_string(),
                    args: parse_arguments(node, source),
                    span,
                },
                // Anonymous classes carry whole method bodies
                _ => unknown(node, source),
            }
        }
        "binary_expression" => {
            match (
                node.child_by_field_name("left"),
                node.child_by_field_name("operator"),
                node.child_by_field_name("right"),
            ) {
                (Some(left), Some(op), Some(right)) => {
                    match BinaryOp::from_token(node_text(op, source)) {
                        Some(op) => Expr::Binary {
                            op,
                            left: Box::new(parse_java_expr(left, source)),
                            right: Box::new(parse_java_expr(right, source)),
                            span,
                        },
                        None => unknown(node, source),
                    }
                }
                _ => unknown(node, source),
            }
        }
        "unary_expression" => {
            match (
                node.child_by_field_name("operator"),
                node.child_by_field_name("operand"),
            ) {
                (Some(op), Some(operand)) => match UnaryOp::from_token(node_text(op, source)) {
                    Some(op) => Expr::Unary {
                        op,
                        operand: Box::new(parse_java_expr(operand, source)),
                        span,
                    },
                    None => unknown(node, source),
                },
                _ => unknown(node, source),
            }
        }
        "update_expression" => parse_update(node, source).unwrap_or_else(|| unknown(node, source)),
        "assignment_expression" => {
            match (
                node.child_by_field_name("left"),
                node.child_by_field_name("operator"),
                node.child_by_field_name("right"),
            ) {
                (Some(target), Some(op), Some(value)) => Expr::Assign {
                    op: node_text(op, source).to_string(),
                    target: Box::new(parse_java_expr(target, source)),
                    value: Box::new(parse_java_expr(value, source)),
                    span,
                },
                _ => unknown(node, source),
            }
        }
        "ternary_expression" => {
            match (
                node.child_by_field_name("condition"),
                node.child_by_field_name("consequence"),
                node.child_by_field_name("alternative"),
            ) {
                (Some(condition), Some(then_branch), Some(else_branch)) => Expr::Conditional {
                    condition: Box::new(parse_java_expr(condition, source)),
                    then_branch: Box::new(parse_java_expr(then_branch, source)),
                    else_branch: Box::new(parse_java_expr(else_branch, source)),
                    span,
                },
                _ => unknown(node, source),
            }
        }
        "cast_expression" => {
            match (
                node.child_by_field_name("type"),
                node.child_by_field_name("value"),
            ) {
                (Some(typ), Some(value)) => Expr::Cast {
                    target_type: node_text(typ, source).to_string(),
                    expr: Box::new(parse_java_expr(value, source)),
                    span,
                },
                _ => unknown(node, source),
            }
        }
        _ => unknown(node, source),
    }
}

fn parse_field_access(node: Node, source: &str) -> Option<Expr> {
    let object = node.child_by_field_name("object")?;
    let field = node.child_by_field_name("field")?;
    let span = node_span(node);

    // `Outer.this` and `Outer.super`
    match field.kind() {
        "this" => {
            return Some(Expr::This {
                qualifier: Some(node_text(object, source).to_string()),
                span,
            })
        }
        "super" => {
            return Some(Expr::Super {
                qualifier: Some(node_text(object, source).to_string()),
                span,
            })
        }
        _ => {}
    }

    Some(Expr::Field {
        object: Box::new(parse_java_expr(object, source)),
        field: node_text(field, source).to_string(),
        span,
    })
}

fn parse_method_invocation(node: Node, source: &str) -> Option<Expr> {
    let name = node.child_by_field_name("name")?;
    let receiver = node
        .child_by_field_name("object")
        .map(|object| Box::new(parse_java_expr(object, source)));

    let type_args = node
        .child_by_field_name("type_arguments")
        .map(|t| node_text(t, source).split_whitespace().collect::<Vec<_>>().join(" "));

    Some(Expr::Call {
        receiver,
        type_args,
        method: node_text(name, source).to_string(),
        args: parse_arguments(node, source),
        span: node_span(node),
    })
}

fn parse_arguments(node: Node, source: &str) -> Vec<Expr> {
    let Some(arguments) = node.child_by_field_name("arguments") else {
        return vec![];
    };
    let mut cursor = arguments.walk();
    let args: Vec<_> = arguments
        .named_children(&mut cursor)
        .filter(|arg| !arg.is_extra())
        .map(|arg| parse_java_expr(arg, source))
        .collect();
    args
}

/// `i++`, `i--`, `++i`, `--i`
fn parse_update(node: Node, source: &str) -> Option<Expr> {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    let op_index = children
        .iter()
        .position(|c| matches!(c.kind(), "++" | "--"))?;
    let operand = children.iter().find(|c| c.is_named() && !c.is_extra())?;

    let prefix = op_index == 0;
    let op = match (children[op_index].kind(), prefix) {
        ("++", true) => UpdateOp::PreInc,
        ("--", true) => UpdateOp::PreDec,
        ("++", false) => UpdateOp::PostInc,
        _ => UpdateOp::PostDec,
    };

    Some(Expr::Update {
        op,
        operand: Box::new(parse_java_expr(*operand, source)),
        span: node_span(node),
    })
}

fn literal(node: Node, source: &str, kind: LiteralKind) -> Expr {
    Expr::Literal {
        kind,
        text: node_text(node, source).to_string(),
        span: node_span(node),
    }
}

/// Any node without a dedicated variant. Whitespace runs in the text are
/// collapsed so the node renders on one line.
fn unknown(node: Node, source: &str) -> Expr {
    let text = node_text(node, source)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    Expr::Unknown {
        kind: node.kind().to_string(),
        text,
        children: nested_expressions(node, source),
        span: node_span(node),
    }
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let child = node.named_children(&mut cursor).find(|c| !c.is_extra());
    child
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_root(expr: &str) -> Expr {
        let source = format!("class T {{ boolean f() {{ return {}; }} }}", expr);
        let mut unit = parse_java(&source).unwrap();
        assert_eq!(unit.roots.len(), 1, "roots of {}", expr);
        unit.roots.remove(0)
    }

    #[test]
    fn test_parse_guarded_equals() {
        let e = single_root("a != null && a.equals(b)");
        assert_eq!(e.to_string(), "a != null && a.equals(b)");
        match e {
            Expr::Binary {
                op: BinaryOp::And,
                right,
                ..
            } => assert!(matches!(*right, Expr::Call { ref method, .. } if method == "equals")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_keeps_parens_and_normalizes_spacing() {
        let e = single_root("((a) == (b))  ||  ((a) != (null) && (a).equals((b)))");
        assert_eq!(
            e.to_string(),
            "((a) == (b)) || ((a) != (null) && (a).equals((b)))"
        );
    }

    #[test]
    fn test_parse_static_field_chain() {
        let e = single_root("A.B.c.equals(s)");
        match e {
            Expr::Call {
                receiver: Some(receiver),
                ..
            } => assert!(matches!(*receiver, Expr::Field { ref field, .. } if field == "c")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_in_index() {
        let e = single_root("a[i++].equals(b[--i])");
        assert_eq!(e.to_string(), "a[i++].equals(b[--i])");
        let Expr::Call { receiver, args, .. } = e else {
            panic!("expected call");
        };
        let receiver = receiver.unwrap();
        assert!(matches!(
            *receiver,
            Expr::Index { ref index, .. } if matches!(**index, Expr::Update { op: UpdateOp::PostInc, .. })
        ));
        assert!(matches!(
            &args[0],
            Expr::Index { index, .. } if matches!(**index, Expr::Update { op: UpdateOp::PreDec, .. })
        ));
    }

    #[test]
    fn test_parse_explicit_type_arguments() {
        let e = single_root("Collections.<String>emptyList().equals(list)");
        assert_eq!(e.to_string(), "Collections.<String>emptyList().equals(list)");

        let e = single_root("this.<Map<K, V>>get(k)");
        assert_eq!(e.to_string(), "this.<Map<K, V>>get(k)");
    }

    #[test]
    fn test_parse_deep_chain() {
        let terms: Vec<String> = (0..10_000).map(|i| format!("\"s{}\"", i)).collect();
        let source = format!("class T {{ String f() {{ return {}; }} }}", terms.join(" + "));
        let unit = parse_java(&source).unwrap();
        assert_eq!(unit.roots.len(), 1);
        let mut depth = 0;
        let mut current = &unit.roots[0];
        while let Expr::Binary { left, .. } = current {
            depth += 1;
            current = left;
        }
        assert_eq!(depth, 9_999);
    }

    #[test]
    fn test_parse_ternary() {
        let e = single_root("(s != null) ? (!s.equals(t.s)) : !(t.s == null)");
        assert!(matches!(e, Expr::Conditional { .. }));
        assert_eq!(
            e.to_string(),
            "(s != null) ? (!s.equals(t.s)) : !(t.s == null)"
        );
    }

    #[test]
    fn test_parse_super_and_this_receivers() {
        let e = single_root("super.equals(o)");
        let Expr::Call { receiver, .. } = e else {
            panic!("expected call");
        };
        assert!(matches!(receiver.as_deref(), Some(Expr::Super { .. })));

        let e = single_root("this.equals(o)");
        let Expr::Call { receiver, .. } = e else {
            panic!("expected call");
        };
        assert!(matches!(receiver.as_deref(), Some(Expr::This { .. })));
    }

    #[test]
    fn test_lambda_keeps_nested_expressions() {
        let e = single_root("check(() -> a != null && a.equals(b))");
        let Expr::Call { args, .. } = e else {
            panic!("expected call");
        };
        let Expr::Unknown { kind, children, .. } = &args[0] else {
            panic!("expected unknown lambda");
        };
        assert_eq!(kind, "lambda_expression");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].to_string(), "a != null && a.equals(b)");
    }

    #[test]
    fn test_spans_are_byte_accurate() {
        let source = "class T { boolean f() { return x.equals(y); } }";
        let unit = parse_java(source).unwrap();
        let span = unit.roots[0].span();
        assert_eq!(&source[span.byte_range()], "x.equals(y)");
        assert_eq!(span.start_line, 1);
    }

    #[test]
    fn test_syntax_errors_are_collected() {
        let unit = parse_java("class T { boolean f() { return a != ; } }").unwrap();
        assert!(!unit.syntax_errors.is_empty());
    }

    #[test]
    fn test_source_hash() {
        let unit = parse_java("class T {}").unwrap();
        assert!(unit.source_hash.starts_with("sha256:"));
        assert!(unit.roots.is_empty());
    }
}
