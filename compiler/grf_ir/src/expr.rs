//! Expression tree.
//!
//! Expressions are a tagged-variant tree. Reduction (in `grf_eval`) matches
//! on `ExprKind` and produces either a resolved `Value` or a smaller `Expr`
//! that still waits on identifiers from a later stage.

use std::fmt;

use crate::{Identifier, Span, Value};

/// Unary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }
}

/// Binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Expression node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// An already resolved constant.
    Const(Value),
    /// A reference to a constant, loop variable, member or feature variable.
    Ident(Identifier),
    /// Array literal `[a, b, c]`.
    Array(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Array comprehension `[body.. for param in source]`.
    ///
    /// Every element of `source` yields one result per body expression.
    Comprehension {
        body: Vec<Expr>,
        param: Identifier,
        source: Box<Expr>,
    },
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn int(value: i64, span: Span) -> Self {
        Self::new(ExprKind::Const(Value::Int(value)), span)
    }

    pub fn constant(value: Value, span: Span) -> Self {
        Self::new(ExprKind::Const(value), span)
    }

    pub fn ident(ident: Identifier) -> Self {
        Self::new(ExprKind::Ident(ident), ident.span)
    }

    pub fn array(items: Vec<Expr>, span: Span) -> Self {
        Self::new(ExprKind::Array(items), span)
    }

    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Binary expression spanning both operands.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn comprehension(body: Vec<Expr>, param: Identifier, source: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Comprehension {
                body,
                param,
                source: Box::new(source),
            },
            span,
        )
    }

    /// The identifier this expression consists of, if it is a bare identifier.
    #[inline]
    pub fn as_identifier(&self) -> Option<Identifier> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(*ident),
            _ => None,
        }
    }

    /// The resolved value, if this expression needs no further reduction.
    #[inline]
    pub fn as_value(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Const(value) => Some(value),
            _ => None,
        }
    }
}
