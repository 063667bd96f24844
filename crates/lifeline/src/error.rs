//! Error type for the diagram building pipeline.

use thiserror::Error;

use lifeline_parser::ParseError;

/// Any failure while turning diagram source into rendered output.
#[derive(Debug, Error)]
pub enum LifelineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The source text did not parse. Carries the offending source so
    /// callers can produce annotated diagnostics.
    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("layout produced non-finite geometry ({width} x {height})")]
    Layout { width: f32, height: f32 },

    #[error(transparent)]
    Export(#[from] crate::export::Error),
}

impl LifelineError {
    pub(crate) fn parse(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// The parse failure, if that is what this error is.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { err, .. } => Some(err),
            _ => None,
        }
    }

    /// The source text attached to a parse failure.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Self::Parse { src, .. } => Some(src),
            _ => None,
        }
    }
}
