//! The error type returned by [`parse`](crate::parse).
//!
//! Lexing recovers from bad characters and keeps going, so a single failed
//! parse can carry several [`Diagnostic`]s. [`ParseError`] holds them all;
//! callers that want per-span reporting iterate [`ParseError::diagnostics`],
//! while `Display` gives a one-line summary suitable for logs.

use std::fmt;

use crate::error::Diagnostic;

/// One or more diagnostics from lexing, statement parsing, or diagram
/// building.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Wrap collected diagnostics in an error.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// All diagnostics, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .count()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostics.as_slice() {
            [] => write!(f, "invalid diagram source"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => {
                write!(f, "{first} (and {} more problem", rest.len())?;
                if rest.len() > 1 {
                    write!(f, "s")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}
