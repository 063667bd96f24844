//! Lifeline renders UML sequence diagrams from a small text DSL to SVG.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! 1. [`parse`] turns source text into a semantic
//!    [`Diagram`](semantic::Diagram),
//! 2. [`layout::Engine`] positions every element with real text metrics,
//! 3. [`export::SvgRenderer`] draws the layout with a [`theme::Theme`].
//!
//! [`DiagramBuilder`] wires the stages together:
//!
//! ```
//! use lifeline::DiagramBuilder;
//!
//! let builder = DiagramBuilder::new();
//! let svg = builder.render_svg("Alice->Bob: Hello").unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod theme;

pub use config::{AppConfig, StyleConfig, ThemeKind};
pub use error::LifelineError;
// The semantic model and parser are part of the public API.
pub use lifeline_core::{color, draw, font, geometry, semantic, text};
pub use lifeline_parser::{ParseError, parse};

use lifeline_core::semantic::Diagram;
use lifeline_core::text::CosmicTextMeasurer;

use crate::export::SvgRenderer;
use crate::layout::{Engine, Layout};
use crate::theme::{PlainTheme, SketchTheme, Theme};

/// Builds diagrams from source text using a shared font system.
///
/// Construction is not free: the text measurer discovers system fonts once.
/// Reuse one builder for many diagrams.
pub struct DiagramBuilder {
    config: AppConfig,
    measurer: CosmicTextMeasurer,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            measurer: CosmicTextMeasurer::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a semantic diagram.
    pub fn parse(&self, source: &str) -> Result<Diagram, LifelineError> {
        lifeline_parser::parse(source).map_err(|err| LifelineError::parse(err, source))
    }

    /// Position every element of a parsed diagram.
    pub fn layout(&self, diagram: &Diagram) -> Result<Layout, LifelineError> {
        let engine = Engine::new(
            self.config.layout().clone(),
            self.config.font().clone(),
            &self.measurer,
        );
        let layout = engine.layout(diagram);
        if !layout.is_finite() {
            return Err(LifelineError::Layout {
                width: layout.size().width(),
                height: layout.size().height(),
            });
        }
        Ok(layout)
    }

    /// Render a parsed diagram to an SVG string.
    pub fn render_diagram(&self, diagram: &Diagram) -> Result<String, LifelineError> {
        let layout = self.layout(diagram)?;
        let theme: Box<dyn Theme> = match self.config.style().theme() {
            ThemeKind::Plain => Box::new(PlainTheme),
            ThemeKind::Sketch => Box::new(SketchTheme),
        };

        let mut renderer = SvgRenderer::new(theme.as_ref(), self.config.font().clone());
        if let Some(color) = self
            .config
            .style()
            .background_color()
            .map_err(LifelineError::Config)?
        {
            renderer = renderer.with_background(color);
        }

        Ok(renderer.render_to_string(&layout))
    }

    /// Parse and render in one step.
    pub fn render_svg(&self, source: &str) -> Result<String, LifelineError> {
        let diagram = self.parse(source)?;
        self.render_diagram(&diagram)
    }
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
