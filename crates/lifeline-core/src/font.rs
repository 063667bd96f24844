//! Font specification for text measurement and rendering.

use serde::Deserialize;

/// A font under which text is measured and rendered.
///
/// The same specification must be used for a given piece of text in both the
/// layout pass (measurement) and the rendering pass, otherwise centering math
/// no longer holds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontSpec {
    /// Font family name, e.g. "Arial".
    #[serde(default = "FontSpec::default_family")]
    family: String,

    /// Font size in points.
    #[serde(default = "FontSpec::default_size")]
    size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Returns the font family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the font size in points.
    pub fn size(&self) -> f32 {
        self.size
    }

    fn default_family() -> String {
        "Arial".to_string()
    }

    fn default_size() -> f32 {
        16.0
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: Self::default_family(),
            size: Self::default_size(),
        }
    }
}
