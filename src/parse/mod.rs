//! Code parsing via tree-sitter
//!
//! Parses source code into expression trees for the recognizer.
//! Supports: Java

mod java;

use crate::ast::*;
use crate::error::{Error, Result};
use crate::stack::ensure_sufficient_stack;
use tree_sitter::{Node, Parser};

pub use java::parse_java;

// Re-export language enum
pub use crate::ast::Language;

/// Get raw tree-sitter S-expression for source code
///
/// This is useful for debugging what tree-sitter sees vs what eqguard builds.
pub fn to_sexp(source: &str, lang: Language) -> Result<String> {
    let mut parser = Parser::new();

    let language = match lang {
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::Unknown => {
            return Err(Error::CodeParse("Cannot parse unknown language".into()));
        }
    };

    parser
        .set_language(&language)
        .map_err(|e| Error::CodeParse(format!("Failed to set language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::CodeParse("Failed to parse source".into()))?;

    Ok(tree.root_node().to_sexp())
}

/// Detect language from file extension
pub fn detect_language(path: &str) -> Language {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "java" => Language::Java,
        _ => Language::Unknown,
    }
}

/// Convert tree-sitter Node position to Span
pub(crate) fn node_span(node: Node) -> Span {
    Span {
        start_line: node.start_position().row + 1,
        start_col: node.start_position().column,
        end_line: node.end_position().row + 1,
        end_col: node.end_position().column,
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
    }
}

/// Source text of a node
pub(crate) fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Collect ERROR and MISSING nodes
pub(crate) fn collect_syntax_errors(node: Node, source: &str, errors: &mut Vec<SyntaxErrorInfo>) {
    ensure_sufficient_stack(|| collect_syntax_errors_at(node, source, errors))
}

fn collect_syntax_errors_at(node: Node, source: &str, errors: &mut Vec<SyntaxErrorInfo>) {
    if node.is_error() || node.is_missing() {
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "unexpected input".to_string()
        };
        let source_text: String = node_text(node, source).chars().take(100).collect();
        errors.push(SyntaxErrorInfo {
            message,
            span: node_span(node),
            source_text,
        });
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_syntax_errors(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("src/Foo.java"), Language::Java);
        assert_eq!(detect_language("src/main.rs"), Language::Unknown);
        assert_eq!(detect_language("README"), Language::Unknown);
    }

    #[test]
    fn test_sexp() {
        let sexp = to_sexp("class A { boolean f(Object a) { return a != null; } }", Language::Java)
            .unwrap();
        assert!(sexp.contains("binary_expression"));
        assert!(sexp.contains("null_literal"));
    }

    #[test]
    fn test_sexp_unknown_language() {
        assert!(to_sexp("x", Language::Unknown).is_err());
    }
}
