//! Equality-pattern recognizer
//!
//! Decides whether one expression is a hand-written null-safe equality test
//! that `java.util.Objects.equals(L, R)` (or its negation) can replace.
//!
//! Recognized forms, parentheses ignored everywhere:
//!
//! ```text
//! L.equals(R)                                   EQUALS      (unguarded)
//! L != null && L.equals(R)                      EQUALS      (null guarded)
//! L == R || (L != null && L.equals(R))          EQUALS      (identity guarded)
//! L == null || !L.equals(R)                     NOT_EQUALS  (null guarded)
//! L != R && (L == null || !L.equals(R))         NOT_EQUALS  (identity guarded)
//! L == null ? R == null : L.equals(R)           EQUALS      (ternary)
//! L == null ? R != null : !L.equals(R)          NOT_EQUALS  (ternary)
//! L != null ? L.equals(R) : R == null           EQUALS      (ternary)
//! L != null ? !L.equals(R) : R != null          NOT_EQUALS  (ternary)
//! ```
//!
//! Every operand that occurs more than once must be the same operand at each
//! site (see [`crate::equivalence`]). The recognizer looks only at the
//! subtree it is given and never at surrounding context.

use crate::ast::{BinaryOp, Expr, Span, UnaryOp};
use crate::config::InspectionConfig;
use crate::equivalence::{contains_unknown, same_operand, strip_parens};
use crate::stack::ensure_sufficient_stack;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Whether the matched expression is the equality test or its negation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Equals,
    NotEquals,
}

/// Which recognized form matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// `L.equals(R)` with no null check
    Unguarded,
    /// `L != null && L.equals(R)`
    NullGuarded,
    /// `L == R || (L != null && L.equals(R))`
    IdentityGuarded,
    /// `L == null || !L.equals(R)`
    NegatedNullGuarded,
    /// `L != R && (L == null || !L.equals(R))`
    NegatedIdentityGuarded,
    /// One of the four conditional forms
    Ternary,
}

/// A recognized null-safe equality test
///
/// Borrows its operands from the inspected tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualsMatch<'a> {
    /// Receiver of the `equals` call, outer parentheses removed
    pub left: &'a Expr,
    /// Argument of the `equals` call, outer parentheses removed
    pub right: &'a Expr,
    pub polarity: Polarity,
    pub shape: Shape,
    /// Span of the recognized expression
    pub span: Span,
}

impl EqualsMatch<'_> {
    /// The `Objects.equals()` expression that replaces the match
    pub fn replacement(&self) -> String {
        let negation = match self.polarity {
            Polarity::Equals => "",
            Polarity::NotEquals => "!",
        };
        format!("{}Objects.equals({}, {})", negation, self.left, self.right)
    }
}

/// Recognize `expr` with the given configuration
pub fn recognize<'a>(expr: &'a Expr, config: &InspectionConfig) -> Option<EqualsMatch<'a>> {
    Recognizer::with_config(config.clone()).recognize(expr)
}

/// Pattern matcher over expression trees
#[derive(Debug, Clone, Default)]
pub struct Recognizer {
    config: InspectionConfig,
}

/// `[!]receiver.equals(argument)`
struct EqualsCall<'a> {
    receiver: &'a Expr,
    argument: &'a Expr,
    negated: bool,
}

/// `operand == null` (`is_null`) or `operand != null`
struct NullCheck<'a> {
    operand: &'a Expr,
    is_null: bool,
}

/// `a == b` (`is_same`) or `a != b`, neither side `null`
struct IdentityCheck<'a> {
    a: &'a Expr,
    b: &'a Expr,
    is_same: bool,
}

/// Operands of a guarded form before the shape is known
struct Operands<'a> {
    left: &'a Expr,
    right: &'a Expr,
}

impl Recognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InspectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    /// Match `expr` against every recognized form
    pub fn recognize<'a>(&self, expr: &'a Expr) -> Option<EqualsMatch<'a>> {
        let node = strip_parens(expr);
        let (operands, polarity, shape) = match node {
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let (operands, polarity) = self.match_ternary(condition, then_branch, else_branch)?;
                (operands, polarity, Shape::Ternary)
            }
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
                ..
            } => self
                .match_null_guarded(left, right)
                .map(|o| (o, Polarity::Equals, Shape::NullGuarded))
                .or_else(|| {
                    self.match_identity_guarded(left, right, false)
                        .map(|o| (o, Polarity::NotEquals, Shape::NegatedIdentityGuarded))
                })?,
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
                ..
            } => self
                .match_negated_null_guarded(left, right)
                .map(|o| (o, Polarity::NotEquals, Shape::NegatedNullGuarded))
                .or_else(|| {
                    self.match_identity_guarded(left, right, true)
                        .map(|o| (o, Polarity::Equals, Shape::IdentityGuarded))
                })?,
            Expr::Call { .. } => {
                if !self.config.ignore_null_check {
                    return None;
                }
                let call = equals_call(node)?;
                (
                    Operands {
                        left: call.receiver,
                        right: call.argument,
                    },
                    Polarity::Equals,
                    Shape::Unguarded,
                )
            }
            _ => return None,
        };

        if contains_unknown(operands.left) || contains_unknown(operands.right) {
            trace!(expr = %node, "operand not fully modelled");
            return None;
        }

        Some(EqualsMatch {
            left: operands.left,
            right: operands.right,
            polarity,
            shape,
            span: expr.span(),
        })
    }

    /// `L != null && L.equals(R)`
    fn match_null_guarded<'a>(&self, guard: &'a Expr, call: &'a Expr) -> Option<Operands<'a>> {
        self.match_guarded_call(guard, call, false)
    }

    /// `L == null || !L.equals(R)`
    fn match_negated_null_guarded<'a>(
        &self,
        guard: &'a Expr,
        call: &'a Expr,
    ) -> Option<Operands<'a>> {
        self.match_guarded_call(guard, call, true)
    }

    /// Null check on `L` followed by an `equals` call on the same `L`.
    /// `negated` selects the `||` form: `L == null` and `!L.equals(R)`.
    fn match_guarded_call<'a>(
        &self,
        guard: &'a Expr,
        call: &'a Expr,
        negated: bool,
    ) -> Option<Operands<'a>> {
        let check = null_check(guard)?;
        let call = equals_call(call)?;
        if check.is_null != negated || call.negated != negated {
            return None;
        }
        if !same_operand(check.operand, call.receiver) {
            trace!(
                guard = %check.operand,
                receiver = %call.receiver,
                "guard does not check receiver"
            );
            return None;
        }
        Some(Operands {
            left: call.receiver,
            right: call.argument,
        })
    }

    /// `L == R || (guarded)` when `is_same`, `L != R && (negated guarded)`
    /// otherwise
    fn match_identity_guarded<'a>(
        &self,
        identity: &'a Expr,
        guarded: &'a Expr,
        is_same: bool,
    ) -> Option<Operands<'a>> {
        let identity = identity_check(identity)?;
        if identity.is_same != is_same {
            return None;
        }

        let operands = match strip_parens(guarded) {
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
                ..
            } if is_same => self.match_null_guarded(left, right)?,
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
                ..
            } if !is_same => self.match_negated_null_guarded(left, right)?,
            _ => return None,
        };

        let direct = same_operand(identity.a, operands.left)
            && same_operand(identity.b, operands.right);
        let swapped = same_operand(identity.a, operands.right)
            && same_operand(identity.b, operands.left);
        if !(direct || swapped) {
            trace!(
                a = %identity.a,
                b = %identity.b,
                "identity check compares different operands"
            );
            return None;
        }
        Some(operands)
    }

    /// `L == null ? R == null : L.equals(R)` and its mirrored and negated
    /// variants
    fn match_ternary<'a>(
        &self,
        condition: &'a Expr,
        then_branch: &'a Expr,
        else_branch: &'a Expr,
    ) -> Option<(Operands<'a>, Polarity)> {
        let check = null_check(condition)?;
        let (null_branch, non_null_branch) = if check.is_null {
            (then_branch, else_branch)
        } else {
            (else_branch, then_branch)
        };

        let call = equals_call(non_null_branch)?;
        if !same_operand(check.operand, call.receiver) {
            return None;
        }

        // Both null: equal. So the null branch tests `R == null` for the
        // positive call and `R != null` for the negated one.
        let right_check = null_check(null_branch)?;
        if right_check.is_null == call.negated {
            trace!(condition = %condition, "ternary branches disagree on polarity");
            return None;
        }
        if !same_operand(right_check.operand, call.argument) {
            return None;
        }

        let polarity = if call.negated {
            Polarity::NotEquals
        } else {
            Polarity::Equals
        };
        Some((
            Operands {
                left: call.receiver,
                right: call.argument,
            },
            polarity,
        ))
    }
}

/// `[!]receiver.equals(argument)` through parentheses and negations
fn equals_call(expr: &Expr) -> Option<EqualsCall<'_>> {
    ensure_sufficient_stack(|| equals_call_at(expr))
}

fn equals_call_at(expr: &Expr) -> Option<EqualsCall<'_>> {
    match strip_parens(expr) {
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
            ..
        } => equals_call(operand).map(|call| EqualsCall {
            negated: !call.negated,
            ..call
        }),
        Expr::Call {
            receiver: Some(receiver),
            method,
            args,
            ..
        } if method == "equals" && args.len() == 1 => {
            let receiver = strip_parens(receiver);
            if !may_be_null(receiver) {
                trace!(receiver = %receiver, "receiver is never null");
                return None;
            }
            Some(EqualsCall {
                receiver,
                argument: strip_parens(&args[0]),
                negated: false,
            })
        }
        _ => None,
    }
}

/// `x == null`, `null != x`, `!(x == null)`, ...
fn null_check(expr: &Expr) -> Option<NullCheck<'_>> {
    ensure_sufficient_stack(|| null_check_at(expr))
}

fn null_check_at(expr: &Expr) -> Option<NullCheck<'_>> {
    match strip_parens(expr) {
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
            ..
        } => null_check(operand).map(|check| NullCheck {
            is_null: !check.is_null,
            ..check
        }),
        Expr::Binary {
            op: op @ (BinaryOp::Eq | BinaryOp::Ne),
            left,
            right,
            ..
        } => {
            let operand = match (left.is_null_literal(), right.is_null_literal()) {
                (false, true) => left,
                (true, false) => right,
                _ => return None,
            };
            Some(NullCheck {
                operand: strip_parens(operand),
                is_null: *op == BinaryOp::Eq,
            })
        }
        _ => None,
    }
}

/// `a == b` or `a != b` where neither side is `null`
fn identity_check(expr: &Expr) -> Option<IdentityCheck<'_>> {
    match strip_parens(expr) {
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
            ..
        } => identity_check(operand).map(|check| IdentityCheck {
            is_same: !check.is_same,
            ..check
        }),
        Expr::Binary {
            op: op @ (BinaryOp::Eq | BinaryOp::Ne),
            left,
            right,
            ..
        } if !left.is_null_literal() && !right.is_null_literal() => Some(IdentityCheck {
            a: strip_parens(left),
            b: strip_parens(right),
            is_same: *op == BinaryOp::Eq,
        }),
        _ => None,
    }
}

/// Receivers that can never be null gain nothing from `Objects.equals()`
fn may_be_null(receiver: &Expr) -> bool {
    !matches!(
        receiver,
        Expr::This { .. } | Expr::Super { .. } | Expr::Literal { .. } | Expr::New { .. }
    )
}
