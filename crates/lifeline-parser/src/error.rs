//! Error and diagnostic system for the Lifeline parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, the originating source line, and help text. Multiple diagnostics
//! are wrapped in [`ParseError`] for returning from the parsing lifecycle.
//!
//! # Example
//!
//! ```
//! # use lifeline_parser::error::{Diagnostic, ErrorCode};
//! # use lifeline_parser::Span;
//!
//! let span = Span::new(14..20);
//!
//! let diag = Diagnostic::error("the execution level for actor `Bob` was dropped below 0")
//!     .with_code(ErrorCode::E200)
//!     .with_label(span, "no open execution to close")
//!     .with_line(3)
//!     .with_help("add a matching `+` earlier in the diagram");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
