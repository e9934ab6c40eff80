//! Diagnostic system for compiler error reporting.
//!
//! Every diagnostic carries:
//! - An error code for searchability
//! - A message (what went wrong)
//! - A primary span (where it went wrong)
//! - Optional notes (context)
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was emitted
//! through a `DiagnosticQueue`. Compilation passes that fail return it, so a
//! failure can never go unreported.

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
