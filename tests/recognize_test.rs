//! Recognizer behaviour on Java snippets
//!
//! Each case wraps an expression in a method body, inspects it and compares
//! the suggested replacements.

use eqguard::{inspect_source, parse_java, InspectionConfig, Polarity, Recognizer, Shape};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn replacements(expr: &str, config: &InspectionConfig) -> Vec<String> {
    let source = format!(
        "class T {{ boolean f(Object a, Object b, Object[] xs, int i) {{ return {}; }} }}",
        expr
    );
    inspect_source(&source, config)
        .unwrap()
        .diagnostics
        .into_iter()
        .map(|d| d.replacement)
        .collect()
}

#[rstest]
#[case::bare_call("a.equals(b)", &["Objects.equals(a, b)"])]
#[case::null_guarded("a != null && a.equals(b)", &["Objects.equals(a, b)"])]
#[case::null_on_left("null != a && a.equals(b)", &["Objects.equals(a, b)"])]
#[case::negated_guard("!(a == null) && a.equals(b)", &["Objects.equals(a, b)"])]
#[case::identity_guarded("a == b || a != null && a.equals(b)", &["Objects.equals(a, b)"])]
#[case::identity_swapped("b == a || a != null && a.equals(b)", &["Objects.equals(a, b)"])]
#[case::negated_null_guarded("a == null || !a.equals(b)", &["!Objects.equals(a, b)"])]
#[case::negated_identity("a != b && (a == null || !a.equals(b))", &["!Objects.equals(a, b)"])]
#[case::ternary("a == null ? b == null : a.equals(b)", &["Objects.equals(a, b)"])]
#[case::ternary_mirrored("a != null ? a.equals(b) : b == null", &["Objects.equals(a, b)"])]
#[case::ternary_negated("a == null ? b != null : !a.equals(b)", &["!Objects.equals(a, b)"])]
#[case::indexed("xs[i] != null && xs[i].equals(b)", &["Objects.equals(xs[i], b)"])]
#[case::type_arguments(
    "java.util.Collections.<Object>emptyList().equals(b)",
    &["Objects.equals(java.util.Collections.<Object>emptyList(), b)"]
)]
fn test_recognized_forms(#[case] expr: &str, #[case] expected: &[&str]) {
    assert_eq!(replacements(expr, &InspectionConfig::default()), expected);
}

#[rstest]
#[case::guard_checks_other_operand("b != null && a.equals(b)", &["Objects.equals(a, b)"])]
#[case::ternary_wrong_polarity("a == null ? b != null : a.equals(b)", &["Objects.equals(a, b)"])]
#[case::ternary_swapped_operands("a == null ? b == null : b.equals(a)", &["Objects.equals(b, a)"])]
#[case::impure_receiver("a.hashCode() != 0 && a.toString() != null && a.toString().equals(b)", &["Objects.equals(a.toString(), b)"])]
#[case::increment_in_index("xs[i++] != null && xs[i++].equals(b)", &["Objects.equals(xs[i++], b)"])]
fn test_only_inner_call_reported(#[case] expr: &str, #[case] expected: &[&str]) {
    assert_eq!(replacements(expr, &InspectionConfig::default()), expected);
}

#[rstest]
#[case::this_receiver("this.equals(a)")]
#[case::super_receiver("super.equals(a)")]
#[case::literal_receiver("\"x\".equals(a)")]
#[case::new_receiver("new Object().equals(a)")]
#[case::two_arguments("a.equals(b, i)")]
#[case::other_method("a.same(b)")]
#[case::plain_null_check("a != null && b != null")]
fn test_not_recognized(#[case] expr: &str) {
    assert!(replacements(expr, &InspectionConfig::default()).is_empty());
}

#[rstest]
#[case("a.equals(b)", 0)]
#[case("!a.equals(b)", 0)]
#[case("a != null && a.equals(b)", 1)]
#[case("a == null ? b == null : a.equals(b)", 1)]
fn test_guarded_only(#[case] expr: &str, #[case] count: usize) {
    assert_eq!(replacements(expr, &InspectionConfig::guarded_only()).len(), count);
}

#[test]
fn test_shape_and_polarity() {
    let source = "class T { boolean f(Object a, Object b) { return a != b && (a == null || !a.equals(b)); } }";
    let report = inspect_source(source, &InspectionConfig::default()).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let d = &report.diagnostics[0];
    assert_eq!(d.shape, Shape::NegatedIdentityGuarded);
    assert_eq!(d.polarity, Polarity::NotEquals);
    assert_eq!(&source[d.span.byte_range()], "a != b && (a == null || !a.equals(b))");
}

type Found = (String, String, Polarity, Shape);

/// Recognizer result for the single root expression of a method body
fn recognized(expr: &str) -> Option<Found> {
    let source = format!("class T {{ boolean f(Object a, Object b) {{ return {}; }} }}", expr);
    let unit = parse_java(&source).unwrap();
    assert_eq!(unit.roots.len(), 1, "roots of {}", expr);
    let found = Recognizer::new()
        .recognize(&unit.roots[0])
        .map(|m| (m.left.to_string(), m.right.to_string(), m.polarity, m.shape));
    found
}

#[rstest]
#[case("a.equals(b)")]
#[case("a != null && a.equals(b)")]
#[case("a == b || a != null && a.equals(b)")]
#[case("a != b && (a == null || !a.equals(b))")]
#[case("a == null ? b == null : a.equals(b)")]
fn test_parenthesized_whole_expression(#[case] expr: &str, #[values(1, 2, 3)] depth: usize) {
    let bare = recognized(expr);
    assert!(bare.is_some(), "{} not recognized", expr);
    let wrapped = format!("{}{}{}", "(".repeat(depth), expr, ")".repeat(depth));
    assert_eq!(recognized(&wrapped), bare);
}

#[test]
fn test_message_keeps_type_arguments() {
    let source = "class T { boolean f(Object b) { return Collections.<String>emptyList().equals(b); } }";
    let report = inspect_source(source, &InspectionConfig::default()).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(
        report.diagnostics[0].message,
        "'Collections.<String>emptyList().equals(b)' replaceable by 'Objects.equals()' expression"
    );
}
