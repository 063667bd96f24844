//! Configuration for diagram building.
//!
//! [`AppConfig`] deserializes from TOML:
//!
//! ```toml
//! [font]
//! family = "Arial"
//! size = 16.0
//!
//! [layout]
//! diagram_margin = 10.0
//! signal_margin = 5.0
//!
//! [style]
//! theme = "sketch"
//! background_color = "#ffffff"
//! ```
//!
//! All fields are optional and default to the plain theme, Arial 16, and a
//! transparent background.

use std::str::FromStr;

use serde::Deserialize;

use lifeline_core::{color::Color, font::FontSpec};

use crate::layout::Metrics;

/// Which drawing theme to render with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    /// Straight lines and crisp boxes.
    #[default]
    Plain,
    /// Hand-drawn look with wobbly strokes.
    Sketch,
}

impl FromStr for ThemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "sketch" => Ok(Self::Sketch),
            other => Err(format!(
                "unknown theme `{other}`, expected `plain` or `sketch`"
            )),
        }
    }
}

/// Visual style settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    theme: ThemeKind,
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn theme(&self) -> ThemeKind {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemeKind) {
        self.theme = theme;
    }

    /// The configured background color, parsed.
    ///
    /// `None` means a transparent background. The color string is kept
    /// verbatim at load time and validated here, so an invalid value only
    /// surfaces when rendering actually needs it.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color.as_deref().map(Color::new).transpose()
    }

    pub fn set_background_color(&mut self, color: Option<String>) {
        self.background_color = color;
    }
}

/// Top-level configuration: font, layout spacing, and visual style.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    font: FontSpec,
    layout: Metrics,
    style: StyleConfig,
}

impl AppConfig {
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn layout(&self) -> &Metrics {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleConfig {
        &mut self.style
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.style().theme(), ThemeKind::Plain);
        assert_eq!(config.font().family(), "Arial");
        assert!(config.style().background_color().unwrap().is_none());
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("plain".parse::<ThemeKind>().unwrap(), ThemeKind::Plain);
        assert_eq!("sketch".parse::<ThemeKind>().unwrap(), ThemeKind::Sketch);
        assert!("neon".parse::<ThemeKind>().is_err());
    }

    #[test]
    fn test_background_color_parses() {
        let mut config = AppConfig::default();
        config
            .style_mut()
            .set_background_color(Some("#abcdef".to_string()));
        let color = config.style().background_color().unwrap();
        assert_eq!(color.unwrap().to_string(), "#abcdef");
    }

    #[test]
    fn test_background_color_invalid() {
        let mut config = AppConfig::default();
        config
            .style_mut()
            .set_background_color(Some("not-a-color".to_string()));
        assert!(config.style().background_color().is_err());
    }
}
