//! Error types for constant reduction.
//!
//! `EvalErrorKind` is the structured category; `EvalError` pairs it with the
//! span of the expression that failed. Constructors below are the public way
//! to build errors so messages stay consistent.

use grf_ir::{BinaryOp, Span, UnaryOp};
use thiserror::Error;

/// Result of a reduction step.
pub type EvalResult<T> = Result<T, EvalError>;

/// Typed error category for reduction failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("unknown identifier `{name}`")]
    UndefinedIdentifier { name: String },

    #[error("expression could not be fully resolved")]
    Unresolved,

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("integer overflow in `{operation}`")]
    IntegerOverflow { operation: &'static str },

    #[error("shift amount {amount} is out of range 0..64")]
    InvalidShift { amount: i64 },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// A reduction failure at a source position.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, span: Span) -> Self {
        EvalError { kind, span }
    }

    pub fn undefined_identifier(name: &str, span: Span) -> Self {
        Self::new(
            EvalErrorKind::UndefinedIdentifier {
                name: name.to_string(),
            },
            span,
        )
    }

    pub fn unresolved(span: Span) -> Self {
        Self::new(EvalErrorKind::Unresolved, span)
    }

    pub fn type_mismatch(expected: &'static str, found: &'static str, span: Span) -> Self {
        Self::new(EvalErrorKind::TypeMismatch { expected, found }, span)
    }
}

impl EvalErrorKind {
    pub(crate) fn overflow(op: BinaryOp) -> Self {
        EvalErrorKind::IntegerOverflow {
            operation: op.as_symbol(),
        }
    }

    pub(crate) fn unary_overflow(op: UnaryOp) -> Self {
        EvalErrorKind::IntegerOverflow {
            operation: op.as_symbol(),
        }
    }
}
