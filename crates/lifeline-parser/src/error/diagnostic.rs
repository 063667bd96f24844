//! The core diagnostic type for the Lifeline error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, multiple labeled source spans, and help text.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// How severe a diagnostic is.
///
/// [`Severity::Error`] means the source cannot become a diagram and the
/// parse fails; [`Severity::Warning`] flags suspicious source (such as a
/// participant that never sends or receives anything) without rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A rich diagnostic message with source location information.
///
/// Diagnostics provide detailed information about errors and warnings,
/// including:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - One or more labeled source spans
/// - A 1-based source line number
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E200]: the execution level for actor `Alice` was dropped below 0
///   --> diagram.seq:4:1
///    |
///  4 | Bob-->-Alice: done
///    | ^^^^^^^^^^^^^^^^^^ no execution to close on `Alice`
///    |
///    = help: remove the `-` or open an execution on `Alice` first
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    line: Option<usize>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use lifeline_parser::error::{Diagnostic, ErrorCode};
    /// # use lifeline_parser::Span;
    ///
    /// let span = Span::new(0..10);
    /// let diag = Diagnostic::error("unexpected token")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(span, "expected a statement")
    ///     .with_line(3)
    ///     .with_help("statements start with `participant`, `title`, `note`, `destroy`, or an actor name");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the 1-based source line this diagnostic points at, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the 1-based source line number.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            line: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert!(!diag.severity().is_warning());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.line().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::new(Severity::Error, "unexpected token").with_code(ErrorCode::E100);

        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_diagnostic_with_label() {
        let diag = Diagnostic::new(Severity::Error, "test error")
            .with_label(Span::new(10..20), "error here");

        assert_eq!(diag.labels().len(), 1);
        assert!(diag.labels()[0].is_primary());
        assert_eq!(diag.labels()[0].message(), "error here");
    }

    #[test]
    fn test_diagnostic_with_secondary_label() {
        let diag = Diagnostic::new(Severity::Error, "conflicting execution change")
            .with_label(Span::new(10..20), "second change here")
            .with_secondary_label(Span::new(5..15), "first change here");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
    }

    #[test]
    fn test_diagnostic_with_line() {
        let diag = Diagnostic::new(Severity::Error, "unexpected token").with_line(7);

        assert_eq!(diag.line(), Some(7));
    }

    #[test]
    fn test_diagnostic_with_help() {
        let diag = Diagnostic::new(Severity::Warning, "unused participant")
            .with_help("consider removing the declaration");

        assert_eq!(diag.help(), Some("consider removing the declaration"));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::new(Severity::Error, "unexpected character `@`")
            .with_code(ErrorCode::E002);

        assert_eq!(diag.to_string(), "error[E002]: unexpected character `@`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::new(Severity::Warning, "unused participant");

        assert_eq!(diag.to_string(), "warning: unused participant");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::new(
            Severity::Error,
            "the execution level for actor `Alice` was dropped below 0",
        )
        .with_code(ErrorCode::E200)
        .with_label(Span::new(100..120), "no execution to close on `Alice`")
        .with_line(4)
        .with_help("remove the `-` or open an execution on `Alice` first");

        assert!(diag.severity().is_error());
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.labels().len(), 1);
        assert_eq!(diag.line(), Some(4));
        assert_eq!(
            diag.help(),
            Some("remove the `-` or open an execution on `Alice` first")
        );
    }
}
