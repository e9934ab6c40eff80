//! Diagnostic queue for collecting and ordering diagnostics.
//!
//! Features:
//! - An error limit; the first error past it is replaced by a single
//!   "too many errors" diagnostic
//! - `ErrorGuaranteed` proof that errors were emitted

use grf_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 10 }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits.
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }
}

/// Queue for collecting and sorting diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// let guarantee = queue.emit_error(diagnostic);
/// let sorted = queue.flush();
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    /// Whether an error was already dropped for exceeding the limit.
    truncated: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            truncated: false,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was dropped
    /// for exceeding the error limit. Warnings are never dropped.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if !diag.is_error() {
            self.diagnostics.push(diag);
            return true;
        }

        if self.limit_reached() {
            if !self.truncated {
                self.truncated = true;
                let note = too_many_errors(self.config.error_limit, diag.primary_span());
                self.diagnostics.push(note);
            }
            return false;
        }

        self.error_count += 1;
        self.diagnostics.push(diag);
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// This is the `fails(kind, message, position)` channel of the compiler:
    /// every fatal condition ends up here.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.add(diag);
        ErrorGuaranteed::new()
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them.
    ///
    /// Clears the queue. Diagnostics without a primary span sort last;
    /// ties keep emission order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|d| d.primary_span().map_or(u32::MAX, |span| span.start));
        self.error_count = 0;
        self.truncated = false;
        std::mem::take(&mut self.diagnostics)
    }
}

/// Create a "too many errors" diagnostic, placed at the first dropped error.
#[cold]
pub fn too_many_errors(limit: usize, at: Option<Span>) -> Diagnostic {
    let diag = Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting due to {limit} previous errors"));
    match at {
        Some(span) => diag.with_label(span, "error limit reached here"),
        None => diag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn error_at(start: u32, message: &str) -> Diagnostic {
        Diagnostic::error(ErrorCode::E2001)
            .with_message(message)
            .with_label(Span::new(start, start + 1), "here")
    }

    #[test]
    fn emit_error_gives_proof_and_counts() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.has_errors().is_none());
        let _ = queue.emit_error(error_at(3, "duplicate"));
        assert!(queue.has_errors().is_some());
        assert_eq!(queue.error_count(), 1);
    }

    #[test]
    fn flush_sorts_by_position_and_clears() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        queue.add(error_at(30, "late"));
        queue.add(error_at(5, "early"));
        queue.add(Diagnostic::error(ErrorCode::E9001).with_message("nowhere"));

        let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, vec!["early", "late", "nowhere"]);
        assert_eq!(queue.error_count(), 0);
        assert!(queue.flush().is_empty());
    }

    #[test]
    fn limit_replaces_the_rest_with_one_error() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig { error_limit: 1 });
        assert!(queue.add(error_at(1, "first")));
        assert!(queue.limit_reached());
        assert!(!queue.add(error_at(2, "second")));
        assert!(!queue.add(error_at(3, "third")));
        assert!(queue.add(Diagnostic::warning(ErrorCode::E2007).with_message("kept")));
        assert_eq!(queue.error_count(), 1);

        let codes: Vec<ErrorCode> = queue.flush().into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E9002, ErrorCode::E2007]);
    }

    #[test]
    fn too_many_errors_points_at_the_dropped_error() {
        let diag = too_many_errors(3, Some(Span::new(8, 9)));
        assert_eq!(diag.message, "aborting due to 3 previous errors");
        assert_eq!(diag.primary_span(), Some(Span::new(8, 9)));
        assert_eq!(too_many_errors(3, None).primary_span(), None);
    }
}
