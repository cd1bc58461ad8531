//! Property-based tests for operand matching
//!
//! Uses proptest to generate side-effect-free operand chains and checks
//! that parentheses never change what gets recognized.

use eqguard::{inspect_source, InspectionConfig, Shape};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "x_[a-z0-9]{0,4}"
}

/// `a`, `a.b.c`, `a.b[i]`, ...
fn operand() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(identifier(), 1..4),
        prop::option::of(identifier()),
    )
        .prop_map(|(path, index)| match index {
            Some(i) => format!("{}[{}]", path.join("."), i),
            None => path.join("."),
        })
}

fn parenthesize(expr: &str, depth: usize) -> String {
    format!("{}{}{}", "(".repeat(depth), expr, ")".repeat(depth))
}

fn shapes(expr: &str) -> Vec<Shape> {
    let source = format!("class T {{ boolean f() {{ return {}; }} }}", expr);
    inspect_source(&source, &InspectionConfig::default())
        .unwrap()
        .diagnostics
        .into_iter()
        .map(|d| d.shape)
        .collect()
}

proptest! {
    #[test]
    fn test_parentheses_do_not_change_guard(
        left in operand(),
        right in operand(),
        guard_depth in 0usize..3,
        receiver_depth in 0usize..3,
    ) {
        let expr = format!(
            "{} != null && {}.equals({})",
            parenthesize(&left, guard_depth),
            parenthesize(&left, receiver_depth),
            right
        );
        prop_assert_eq!(shapes(&expr), vec![Shape::NullGuarded]);
    }

    #[test]
    fn test_identity_accepts_either_order(left in operand(), right in operand(), swap: bool) {
        let identity = if swap {
            format!("{} == {}", right, left)
        } else {
            format!("{} == {}", left, right)
        };
        let expr = format!("{} || {} != null && {}.equals({})", identity, left, left, right);
        prop_assert_eq!(shapes(&expr), vec![Shape::IdentityGuarded]);
    }

    #[test]
    fn test_call_in_guarded_operand_reports_inner_call(left in operand(), right in operand()) {
        let receiver = format!("{}.x_get()", left);
        let expr = format!("{} != null && {}.equals({})", receiver, receiver, right);
        prop_assert_eq!(shapes(&expr), vec![Shape::Unguarded]);
    }
}
