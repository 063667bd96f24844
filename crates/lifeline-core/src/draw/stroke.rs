//! Stroke and line-style definitions.
//!
//! [`StrokeDefinition`] bundles the stroke properties (color, width, dash
//! style) applied to lines, boxes, and lifelines. The system follows SVG/CSS
//! terminology: [`StrokeStyle`] maps directly to `stroke-dasharray` values.
//!
//! Use the [`apply_stroke!`](crate::apply_stroke!) macro to apply all stroke
//! attributes to an SVG element at once:
//!
//! ```
//! use lifeline_core::draw::StrokeDefinition;
//! use lifeline_core::color::Color;
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::solid(Color::black(), 2.0);
//! let rect = svg_element::Rectangle::new().set("x", 0).set("y", 0);
//! let rect = lifeline_core::apply_stroke!(rect, &stroke);
//! ```

use std::str::FromStr;

use crate::color::Color;

/// Defines the visual style of a stroke, including dash patterns.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line (6px dash, 2px gap)
    Dashed,
    /// Dotted line (2px dot, 3px gap)
    Dotted,
    /// Custom SVG dasharray pattern, e.g. "10,5,2,3"
    Custom(String),
}

impl StrokeStyle {
    /// Returns the SVG `stroke-dasharray` value, or `None` for solid lines.
    pub fn dasharray(&self) -> Option<&str> {
        match self {
            StrokeStyle::Solid => None,
            StrokeStyle::Dashed => Some("6,2"),
            StrokeStyle::Dotted => Some("2,3"),
            StrokeStyle::Custom(pattern) => Some(pattern),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            other => Err(format!("unknown stroke style `{other}`")),
        }
    }
}

/// The complete set of stroke properties for a drawable element.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Create a stroke with the default solid style.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Create a solid stroke.
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Create a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    /// Create a dotted stroke.
    pub fn dotted(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dotted)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::black(), 2.0)
    }
}

/// Applies all stroke attributes of a [`StrokeDefinition`] to an SVG element.
///
/// Sets `stroke`, `stroke-width`, and `stroke-dasharray` (the last only for
/// non-solid styles). Returns the modified element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke = $stroke;
        let element = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-width", stroke.width());
        match stroke.style().dasharray() {
            Some(pattern) => element.set("stroke-dasharray", pattern),
            None => element,
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.dasharray(), None);
        assert_eq!(StrokeStyle::Dashed.dasharray(), Some("6,2"));
        assert_eq!(StrokeStyle::Dotted.dasharray(), Some("2,3"));
        assert_eq!(
            StrokeStyle::Custom("1,2".to_string()).dasharray(),
            Some("1,2")
        );
    }

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!("solid".parse::<StrokeStyle>().unwrap(), StrokeStyle::Solid);
        assert_eq!(
            "dashed".parse::<StrokeStyle>().unwrap(),
            StrokeStyle::Dashed
        );
        assert!("wavy".parse::<StrokeStyle>().is_err());
    }

    #[test]
    fn test_stroke_builders() {
        let stroke = StrokeDefinition::dotted(Color::black(), 1.5);
        assert_eq!(stroke.width(), 1.5);
        assert_eq!(stroke.style(), &StrokeStyle::Dotted);

        let stroke = stroke.with_width(3.0).with_style(StrokeStyle::Solid);
        assert_eq!(stroke.width(), 3.0);
        assert_eq!(stroke.style(), &StrokeStyle::Solid);
    }

    #[test]
    fn test_apply_stroke_macro() {
        let stroke = StrokeDefinition::dashed(Color::black(), 2.0);
        let line = svg::node::element::Line::new();
        let line = apply_stroke!(line, &stroke);
        let rendered = line.to_string();
        assert!(rendered.contains("stroke=\"#000000\""));
        assert!(rendered.contains("stroke-dasharray=\"6,2\""));
    }
}
