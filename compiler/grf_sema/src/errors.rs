//! Registration and dispatch errors.

use grf_eval::{EvalError, EvalErrorKind};
use grf_ir::Span;
use thiserror::Error;

pub type SemaResult<T> = Result<T, SemaError>;

/// Broad classes of failure, used to pick diagnostic codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A name that must be an identifier is something else, or a layout
    /// is bound with the wrong number of arguments.
    SyntaxShape,
    /// A name is defined twice or collides with a reserved one.
    DuplicateName,
    /// A referenced structure or identifier does not exist.
    UndefinedReference,
    /// A structure was re-entered while still registering.
    RecursiveRegistration,
    /// Constant evaluation or encoding failed.
    Evaluation,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemaErrorKind {
    #[error("{what} must be an identifier")]
    NotAnIdentifier { what: &'static str },

    #[error("duplicate parameter name `{name}`")]
    DuplicateParameter { name: String, first: Span },

    #[error("member name `{name}` shadows a global constant")]
    ShadowsGlobalConstant { name: String },

    #[error("{what} `{name}` is already defined")]
    DuplicateDefinition {
        what: &'static str,
        name: String,
        previous: Option<Span>,
    },

    #[error("unknown structure `{name}`")]
    UndefinedStructure { name: String },

    #[error("structure `{name}` is re-entered while it is still being registered")]
    RecursiveRegistration { name: String, outer: Span },

    #[error("layout `{layout}` takes {expected} argument(s), {found} given")]
    ArgumentCount {
        layout: String,
        expected: usize,
        found: usize,
    },

    #[error("{what} {value} does not fit the action encoding")]
    ValueOutOfRange { what: &'static str, value: i64 },

    #[error(transparent)]
    Eval(#[from] EvalErrorKind),
}

impl SemaErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SemaErrorKind::NotAnIdentifier { .. } | SemaErrorKind::ArgumentCount { .. } => {
                ErrorCategory::SyntaxShape
            }
            SemaErrorKind::DuplicateParameter { .. }
            | SemaErrorKind::ShadowsGlobalConstant { .. }
            | SemaErrorKind::DuplicateDefinition { .. } => ErrorCategory::DuplicateName,
            SemaErrorKind::UndefinedStructure { .. }
            | SemaErrorKind::Eval(EvalErrorKind::UndefinedIdentifier { .. }) => {
                ErrorCategory::UndefinedReference
            }
            SemaErrorKind::RecursiveRegistration { .. } => ErrorCategory::RecursiveRegistration,
            SemaErrorKind::ValueOutOfRange { .. } | SemaErrorKind::Eval(_) => {
                ErrorCategory::Evaluation
            }
        }
    }
}

/// A registration or dispatch failure at the offending token.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemaError {
    pub kind: SemaErrorKind,
    pub span: Span,
}

impl SemaError {
    pub fn new(kind: SemaErrorKind, span: Span) -> Self {
        SemaError { kind, span }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub(crate) fn not_an_identifier(what: &'static str, span: Span) -> Self {
        Self::new(SemaErrorKind::NotAnIdentifier { what }, span)
    }

    pub(crate) fn duplicate_definition(
        what: &'static str,
        name: &str,
        span: Span,
        previous: Option<Span>,
    ) -> Self {
        Self::new(
            SemaErrorKind::DuplicateDefinition {
                what,
                name: name.to_string(),
                previous,
            },
            span,
        )
    }
}

impl From<EvalError> for SemaError {
    fn from(err: EvalError) -> Self {
        SemaError::new(SemaErrorKind::Eval(err.kind), err.span)
    }
}
