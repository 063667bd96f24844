//! Export of laid-out diagrams to output formats.

pub mod svg;

pub use self::svg::SvgRenderer;

use thiserror::Error;

/// Errors produced while exporting a rendered diagram.
#[derive(Debug, Error)]
pub enum Error {
    #[error("render error: {0}")]
    Render(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
