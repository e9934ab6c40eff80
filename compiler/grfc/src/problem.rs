//! Rendering compilation errors as diagnostics.
//!
//! Errors describe what went wrong; this module decides the code, labels and
//! notes a user sees for each of them.

use grf_diagnostic::{Diagnostic, ErrorCode};
use grf_eval::EvalErrorKind;
use grf_sema::{SemaError, SemaErrorKind};

/// The diagnostic reported for `err`.
pub fn sema_diagnostic(err: &SemaError) -> Diagnostic {
    let span = err.span;
    let diag = Diagnostic::error(error_code(&err.kind)).with_message(err.to_string());
    match &err.kind {
        SemaErrorKind::NotAnIdentifier { .. } => diag.with_label(span, "expected an identifier"),
        SemaErrorKind::ArgumentCount { expected, .. } => {
            diag.with_label(span, format!("expects {expected} argument(s)"))
        }
        SemaErrorKind::DuplicateParameter { first, .. } => diag
            .with_label(span, "used again here")
            .with_secondary_label(*first, "first used here"),
        SemaErrorKind::ShadowsGlobalConstant { .. } => diag
            .with_label(span, "member defined here")
            .with_note("global constants cannot be redefined as members"),
        SemaErrorKind::DuplicateDefinition { previous, .. } => {
            let diag = diag.with_label(span, "redefined here");
            match previous {
                Some(previous) => diag.with_secondary_label(*previous, "first defined here"),
                None => diag,
            }
        }
        SemaErrorKind::UndefinedStructure { .. } => diag.with_label(span, "structure not found"),
        SemaErrorKind::RecursiveRegistration { outer, .. } => diag
            .with_label(span, "entered again here")
            .with_secondary_label(*outer, "still being registered"),
        SemaErrorKind::ValueOutOfRange { .. } => diag
            .with_label(span, "in this sprite")
            .with_note("sprite values are encoded as 32-bit integers and counts as bytes"),
        SemaErrorKind::Eval(EvalErrorKind::UndefinedIdentifier { .. }) => {
            diag.with_label(span, "not found in this scope")
        }
        SemaErrorKind::Eval(EvalErrorKind::Unresolved) => diag
            .with_label(span, "still depends on an unknown value")
            .with_note("this is a compiler bug: fatal reduction left an expression pending"),
        SemaErrorKind::Eval(_) => diag.with_label(span, "in this expression"),
    }
}

fn error_code(kind: &SemaErrorKind) -> ErrorCode {
    match kind {
        SemaErrorKind::NotAnIdentifier { .. } => ErrorCode::E1001,
        SemaErrorKind::ArgumentCount { .. } => ErrorCode::E1002,
        SemaErrorKind::DuplicateDefinition { .. } => ErrorCode::E2001,
        SemaErrorKind::DuplicateParameter { .. } => ErrorCode::E2002,
        SemaErrorKind::ShadowsGlobalConstant { .. } => ErrorCode::E2003,
        SemaErrorKind::UndefinedStructure { .. } => ErrorCode::E2005,
        SemaErrorKind::RecursiveRegistration { .. } => ErrorCode::E2006,
        SemaErrorKind::ValueOutOfRange { .. } => ErrorCode::E6006,
        SemaErrorKind::Eval(kind) => match kind {
            EvalErrorKind::UndefinedIdentifier { .. } => ErrorCode::E2004,
            EvalErrorKind::DivisionByZero => ErrorCode::E6001,
            EvalErrorKind::ModuloByZero => ErrorCode::E6002,
            EvalErrorKind::IntegerOverflow { .. } => ErrorCode::E6003,
            EvalErrorKind::TypeMismatch { .. } => ErrorCode::E6004,
            EvalErrorKind::InvalidShift { .. } => ErrorCode::E6005,
            EvalErrorKind::Unresolved => ErrorCode::E9001,
        },
    }
}
