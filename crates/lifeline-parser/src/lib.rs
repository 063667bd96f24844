//! # Lifeline Parser
//!
//! Parser for the lifeline sequence-diagram language. This crate provides
//! the pipeline from source text to the semantic diagram representation.
//!
//! ## Usage
//!
//! ```
//! # use lifeline_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//!         title: Greeting\n\
//!         Alice->Bob: Hello Bob\n\
//!         Bob-->Alice: Hello Alice\n\
//!         note right of Bob: thinking\n";
//!
//!     let diagram = parse(source)?;
//!     assert_eq!(diagram.actors().len(), 2);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use error::ParseError;
pub use span::{Span, Spanned};

use lifeline_core::semantic::Diagram;

use crate::elaborate::Builder;

/// Parse source text into a semantic diagram.
///
/// Orchestrates the complete pipeline:
///
/// 1. **Tokenize** - convert source text to positioned tokens
/// 2. **Parse** - build a statement list from the tokens
/// 3. **Elaborate** - resolve actors and execution levels into a [`Diagram`]
///
/// Lexing collects every diagnostic it can recover from before failing;
/// the later stages stop at the first error.
///
/// # Example
///
/// ```
/// # use lifeline_parser::{parse, ParseError};
///
/// fn main() -> Result<(), ParseError> {
///     let diagram = parse("Alice->+Bob: request\nBob-->-Alice: response")?;
///     assert_eq!(diagram.sequence().len(), 2);
///     Ok(())
/// }
/// ```
pub fn parse(source: &str) -> Result<Diagram, ParseError> {
    let tokens = lexer::tokenize(source)?;

    let statements = parser::build_statements(&tokens)?;

    Builder::new().build(statements).map_err(ParseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use lifeline_core::semantic::{Entry, NotePlacement};

    #[test]
    fn test_parse_full_pipeline() {
        let diagram = parse(
            "title: Demo\n\
             participant Alice\n\
             Alice->+Bob: request\n\
             Bob-->-Alice: response\n\
             note over Alice, Bob: done\n",
        )
        .expect("expected a valid diagram");

        assert_eq!(diagram.title().map(|t| t.message()), Some("Demo"));
        assert_eq!(diagram.actors().len(), 2);
        assert_eq!(diagram.sequence().len(), 3);
        match &diagram.sequence()[2] {
            Entry::Note(note) => assert_eq!(note.placement(), NotePlacement::Over),
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_lex_error() {
        let err = parse("Alice->Bob: hi\n\"unterminated\n").expect_err("expected failure");

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }

    #[test]
    fn test_parse_syntax_error() {
        let err = parse("Alice->Bob hi\n").expect_err("expected failure");

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_parse_semantic_error() {
        let err = parse("Bob-->-Alice: done\n").expect_err("expected failure");

        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
        assert_eq!(err.diagnostics()[0].line(), Some(1));
    }

    #[test]
    fn test_parse_empty_input() {
        let diagram = parse("").expect("empty input is a valid, empty diagram");

        assert!(diagram.actors().is_empty());
        assert!(diagram.sequence().is_empty());
    }
}
