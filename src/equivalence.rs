//! Expression equivalence for operands that occur more than once
//!
//! Two occurrences denote the same value when their canonical forms are
//! equal. The canonical form drops spans and parentheses and exists only for
//! side-effect-free expressions: a call, `new`, increment, decrement or
//! assignment anywhere in the tree means each occurrence may evaluate to a
//! different value, so such expressions have no canonical form and are never
//! the same operand, not even as themselves.
//!
//! Calls are excluded even when textually identical: purity of a method is
//! not something a syntactic check can know.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::stack::ensure_sufficient_stack;

/// Canonical, span-free form of a side-effect-free expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperandKey {
    Literal(String),
    Name(String),
    This(Option<String>),
    Super(Option<String>),
    Field(Box<OperandKey>, String),
    Index(Box<OperandKey>, Box<OperandKey>),
    Binary(BinaryOp, Box<OperandKey>, Box<OperandKey>),
    Unary(UnaryOp, Box<OperandKey>),
    Conditional(Box<OperandKey>, Box<OperandKey>, Box<OperandKey>),
    Cast(String, Box<OperandKey>),
}

/// Remove any number of enclosing parentheses
pub fn strip_parens(expr: &Expr) -> &Expr {
    let mut current = expr;
    while let Expr::Paren { inner, .. } = current {
        current = inner;
    }
    current
}

/// Canonical form of `expr`, or `None` if evaluating it twice could observe
/// different values
pub fn canonical(expr: &Expr) -> Option<OperandKey> {
    ensure_sufficient_stack(|| canonical_node(expr))
}

fn canonical_node(expr: &Expr) -> Option<OperandKey> {
    let key = match expr {
        Expr::Paren { inner, .. } => return canonical(inner),
        Expr::Literal { text, .. } => OperandKey::Literal(text.clone()),
        Expr::Name { name, .. } => OperandKey::Name(name.clone()),
        Expr::This { qualifier, .. } => OperandKey::This(qualifier.clone()),
        Expr::Super { qualifier, .. } => OperandKey::Super(qualifier.clone()),
        Expr::Field { object, field, .. } => {
            OperandKey::Field(Box::new(canonical(object)?), field.clone())
        }
        Expr::Index { array, index, .. } => OperandKey::Index(
            Box::new(canonical(array)?),
            Box::new(canonical(index)?),
        ),
        Expr::Binary {
            op, left, right, ..
        } => OperandKey::Binary(
            *op,
            Box::new(canonical(left)?),
            Box::new(canonical(right)?),
        ),
        Expr::Unary { op, operand, .. } => OperandKey::Unary(*op, Box::new(canonical(operand)?)),
        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
            ..
        } => OperandKey::Conditional(
            Box::new(canonical(condition)?),
            Box::new(canonical(then_branch)?),
            Box::new(canonical(else_branch)?),
        ),
        Expr::Cast {
            target_type, expr, ..
        } => OperandKey::Cast(target_type.clone(), Box::new(canonical(expr)?)),
        Expr::Call { .. }
        | Expr::New { .. }
        | Expr::Update { .. }
        | Expr::Assign { .. }
        | Expr::Unknown { .. } => return None,
    };
    Some(key)
}

/// Can `expr` be evaluated repeatedly with the same result?
pub fn is_side_effect_free(expr: &Expr) -> bool {
    canonical(expr).is_some()
}

/// Do `a` and `b` denote the same accessed value at both occurrence sites?
pub fn same_operand(a: &Expr, b: &Expr) -> bool {
    match (canonical(a), canonical(b)) {
        (Some(ka), Some(kb)) => ka == kb,
        _ => false,
    }
}

/// Does the tree contain a node the front-end could not model?
pub fn contains_unknown(expr: &Expr) -> bool {
    ensure_sufficient_stack(|| {
        matches!(expr, Expr::Unknown { .. }) || expr.children().into_iter().any(contains_unknown)
    })
}
