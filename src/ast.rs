//! AST types for expression representation
//!
//! Immutable expression trees handed to the recognizer. Built from Java
//! source via tree-sitter (see [`crate::parse`]), but any front-end that can
//! produce these nodes works: the recognizer only needs a node's kind, its
//! children, its operator or method name and its span.

use crate::stack::ensure_sufficient_stack;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed source: every outermost expression found in the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Source language
    pub language: Language,

    /// Outermost expressions, in source order
    pub roots: Vec<Expr>,

    /// Syntax errors reported by the parser
    pub syntax_errors: Vec<SyntaxErrorInfo>,

    /// Hash of source for change detection
    pub source_hash: String,
}

/// Source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Unknown,
}

/// Information about a syntax error
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyntaxErrorInfo {
    /// Error message
    pub message: String,
    /// Source location
    pub span: Span,
    /// The source text with the error
    pub source_text: String,
}

/// Source location
///
/// Lines are 1-based, columns 0-based. Byte offsets index into the parsed
/// source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Span {
    /// Byte range covered by this span
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start_byte..self.end_byte
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value, kept as written
    Literal {
        kind: LiteralKind,
        text: String,
        span: Span,
    },

    /// Simple name (local, parameter, field or type name)
    Name { name: String, span: Span },

    /// `this` (optionally qualified, e.g. `Outer.this`)
    This {
        qualifier: Option<String>,
        span: Span,
    },

    /// `super` (optionally qualified)
    Super {
        qualifier: Option<String>,
        span: Span,
    },

    /// Field access `object.field`
    Field {
        object: Box<Expr>,
        field: String,
        span: Span,
    },

    /// Array access `array[index]`
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },

    /// Method invocation, with or without an explicit receiver
    Call {
        receiver: Option<Box<Expr>>,
        /// Explicit type arguments as written, e.g. `<T>` in `c.<T>f()`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_args: Option<String>,
        method: String,
        args: Vec<Expr>,
        span: Span,
    },

    /// Instance creation `new T(args)`
    New {
        class: String,
        args: Vec<Expr>,
        span: Span,
    },

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// Prefix unary operation (`!`, `-`, `+`, `~`)
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// Increment or decrement, prefix or postfix
    Update {
        op: UpdateOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// Assignment, simple or compound (`=`, `+=`, ...)
    Assign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },

    /// Conditional `condition ? then_branch : else_branch`
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        span: Span,
    },

    /// Parenthesized expression
    Paren { inner: Box<Expr>, span: Span },

    /// Type cast `(T) expr`
    Cast {
        target_type: String,
        expr: Box<Expr>,
        span: Span,
    },

    /// Any other expression kind. Nested expressions are kept as children
    /// so they can still be inspected.
    Unknown {
        kind: String,
        text: String,
        children: Vec<Expr>,
        span: Span,
    },
}

/// Literal kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    Null,
    Bool,
    Int,
    Float,
    Char,
    String,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl BinaryOp {
    /// Parse a Java operator token
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Mod => write!(f, "%"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::Ne => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Le => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Ge => write!(f, ">="),
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
            BinaryOp::BitAnd => write!(f, "&"),
            BinaryOp::BitOr => write!(f, "|"),
            BinaryOp::BitXor => write!(f, "^"),
            BinaryOp::Shl => write!(f, "<<"),
            BinaryOp::Shr => write!(f, ">>"),
            BinaryOp::UShr => write!(f, ">>>"),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Plus,
            "!" => UnaryOp::Not,
            "~" => UnaryOp::BitNot,
            _ => return None,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::BitNot => write!(f, "~"),
        }
    }
}

/// Increment and decrement operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl Expr {
    /// Get the span of this node
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. } => *span,
            Expr::Name { span, .. } => *span,
            Expr::This { span, .. } => *span,
            Expr::Super { span, .. } => *span,
            Expr::Field { span, .. } => *span,
            Expr::Index { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::New { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Update { span, .. } => *span,
            Expr::Assign { span, .. } => *span,
            Expr::Conditional { span, .. } => *span,
            Expr::Paren { span, .. } => *span,
            Expr::Cast { span, .. } => *span,
            Expr::Unknown { span, .. } => *span,
        }
    }

    /// Short node kind name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Literal { .. } => "literal",
            Expr::Name { .. } => "name",
            Expr::This { .. } => "this",
            Expr::Super { .. } => "super",
            Expr::Field { .. } => "field",
            Expr::Index { .. } => "index",
            Expr::Call { .. } => "call",
            Expr::New { .. } => "new",
            Expr::Binary { .. } => "binary",
            Expr::Unary { .. } => "unary",
            Expr::Update { .. } => "update",
            Expr::Assign { .. } => "assign",
            Expr::Conditional { .. } => "conditional",
            Expr::Paren { .. } => "paren",
            Expr::Cast { .. } => "cast",
            Expr::Unknown { .. } => "unknown",
        }
    }

    /// Direct child expressions, in source order
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal { .. } | Expr::Name { .. } | Expr::This { .. } | Expr::Super { .. } => {
                vec![]
            }
            Expr::Field { object, .. } => vec![object.as_ref()],
            Expr::Index { array, index, .. } => vec![array.as_ref(), index.as_ref()],
            Expr::Call { receiver, args, .. } => {
                receiver.iter().map(|r| r.as_ref()).chain(args.iter()).collect()
            }
            Expr::New { args, .. } => args.iter().collect(),
            Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Unary { operand, .. } | Expr::Update { operand, .. } => vec![operand.as_ref()],
            Expr::Assign { target, value, .. } => vec![target.as_ref(), value.as_ref()],
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => vec![
                condition.as_ref(),
                then_branch.as_ref(),
                else_branch.as_ref(),
            ],
            Expr::Paren { inner, .. } => vec![inner.as_ref()],
            Expr::Cast { expr, .. } => vec![expr.as_ref()],
            Expr::Unknown { children, .. } => children.iter().collect(),
        }
    }

    /// Is this the `null` literal (ignoring parentheses)?
    pub fn is_null_literal(&self) -> bool {
        let mut current = self;
        while let Expr::Paren { inner, .. } = current {
            current = inner;
        }
        matches!(
            current,
            Expr::Literal {
                kind: LiteralKind::Null,
                ..
            }
        )
    }

    /// Move the direct children out into `out`, leaving empty leaves behind
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Literal { .. } | Expr::Name { .. } | Expr::This { .. } | Expr::Super { .. } => {}
            Expr::Field { object, .. } => detach(object, out),
            Expr::Index { array, index, .. } => {
                detach(array, out);
                detach(index, out);
            }
            Expr::Call { receiver, args, .. } => {
                if let Some(receiver) = receiver.as_mut() {
                    detach(receiver, out);
                }
                out.append(args);
            }
            Expr::New { args, .. } => out.append(args),
            Expr::Binary { left, right, .. } => {
                detach(left, out);
                detach(right, out);
            }
            Expr::Unary { operand, .. } | Expr::Update { operand, .. } => detach(operand, out),
            Expr::Assign { target, value, .. } => {
                detach(target, out);
                detach(value, out);
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                detach(condition, out);
                detach(then_branch, out);
                detach(else_branch, out);
            }
            Expr::Paren { inner, .. } => detach(inner, out),
            Expr::Cast { expr, .. } => detach(expr, out),
            Expr::Unknown { children, .. } => out.append(children),
        }
    }

    /// Allocation-free placeholder
    fn hole() -> Expr {
        Expr::Unknown {
            kind: String::new(),
            text: String::new(),
            children: Vec::new(),
            span: Span::default(),
        }
    }
}

fn detach(child: &mut Expr, out: &mut Vec<Expr>) {
    out.push(std::mem::replace(child, Expr::hole()));
}

/// Torn down iteratively: a long operator chain is as deep as it has terms.
impl Drop for SourceUnit {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.roots);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

/// Canonical rendering: single spaces around binary operators, parentheses
/// kept as written.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| self.fmt_node(f))
    }
}

impl Expr {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { text, .. } => write!(f, "{}", text),
            Expr::Name { name, .. } => write!(f, "{}", name),
            Expr::This { qualifier, .. } => match qualifier {
                Some(q) => write!(f, "{}.this", q),
                None => write!(f, "this"),
            },
            Expr::Super { qualifier, .. } => match qualifier {
                Some(q) => write!(f, "{}.super", q),
                None => write!(f, "super"),
            },
            Expr::Field { object, field, .. } => write!(f, "{}.{}", object, field),
            Expr::Index { array, index, .. } => write!(f, "{}[{}]", array, index),
            Expr::Call {
                receiver,
                type_args,
                method,
                args,
                ..
            } => {
                if let Some(r) = receiver {
                    write!(f, "{}.", r)?;
                }
                if let Some(t) = type_args {
                    write!(f, "{}", t)?;
                }
                write!(f, "{}(", method)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            Expr::New { class, args, .. } => {
                write!(f, "new {}(", class)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            Expr::Binary {
                op, left, right, ..
            } => write!(f, "{} {} {}", left, op, right),
            Expr::Unary { op, operand, .. } => write!(f, "{}{}", op, operand),
            Expr::Update { op, operand, .. } => match op {
                UpdateOp::PreInc => write!(f, "++{}", operand),
                UpdateOp::PreDec => write!(f, "--{}", operand),
                UpdateOp::PostInc => write!(f, "{}++", operand),
                UpdateOp::PostDec => write!(f, "{}--", operand),
            },
            Expr::Assign {
                op, target, value, ..
            } => write!(f, "{} {} {}", target, op, value),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => write!(f, "{} ? {} : {}", condition, then_branch, else_branch),
            Expr::Paren { inner, .. } => write!(f, "({})", inner),
            Expr::Cast {
                target_type, expr, ..
            } => write!(f, "({}) {}", target_type, expr),
            Expr::Unknown { text, .. } => write!(f, "{}", text),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod build {
    //! Terse constructors for hand-built trees in tests. Spans are zeroed.

    use super::*;

    pub fn name(n: &str) -> Expr {
        Expr::Name {
            name: n.into(),
            span: Span::default(),
        }
    }

    pub fn null() -> Expr {
        Expr::Literal {
            kind: LiteralKind::Null,
            text: "null".into(),
            span: Span::default(),
        }
    }

    pub fn this() -> Expr {
        Expr::This {
            qualifier: None,
            span: Span::default(),
        }
    }

    pub fn field(object: Expr, f: &str) -> Expr {
        Expr::Field {
            object: Box::new(object),
            field: f.into(),
            span: Span::default(),
        }
    }

    pub fn index(array: Expr, i: Expr) -> Expr {
        Expr::Index {
            array: Box::new(array),
            index: Box::new(i),
            span: Span::default(),
        }
    }

    pub fn call(receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
        Expr::Call {
            receiver: Some(Box::new(receiver)),
            type_args: None,
            method: method.into(),
            args,
            span: Span::default(),
        }
    }

    pub fn equals(receiver: Expr, arg: Expr) -> Expr {
        call(receiver, "equals", vec![arg])
    }

    pub fn bin(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: Span::default(),
        }
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
            span: Span::default(),
        }
    }

    pub fn paren(inner: Expr) -> Expr {
        Expr::Paren {
            inner: Box::new(inner),
            span: Span::default(),
        }
    }

    pub fn post_inc(operand: Expr) -> Expr {
        Expr::Update {
            op: UpdateOp::PostInc,
            operand: Box::new(operand),
            span: Span::default(),
        }
    }

    pub fn cond(c: Expr, t: Expr, e: Expr) -> Expr {
        Expr::Conditional {
            condition: Box::new(c),
            then_branch: Box::new(t),
            else_branch: Box::new(e),
            span: Span::default(),
        }
    }
}
