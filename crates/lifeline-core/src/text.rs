//! Text measurement capability.
//!
//! Layout needs the rendered size of every message, actor name, and title
//! before any drawing happens. [`TextMeasurer`] abstracts that capability so
//! the layout engine can be driven by real font metrics in production
//! ([`CosmicTextMeasurer`]) or by deterministic metrics in tests
//! ([`FixedMeasurer`]).

use std::sync::{Arc, Mutex};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::{font::FontSpec, geometry::Size};

/// Measures the bounding box of a text block under a given font.
///
/// Implementations must handle multi-line text (lines separated by `\n`)
/// and return a box consistent enough for centering math: the center of the
/// text is `position + size / 2`.
pub trait TextMeasurer {
    /// Calculate the rendered size of `text` under `font`.
    fn measure(&self, text: &str, font: &FontSpec) -> Size;
}

/// Text measurement backed by real font metrics and shaping.
///
/// Maintains a reusable [`FontSystem`] instance behind a mutex to avoid
/// expensive recreation. Cloning shares the same font system, so one
/// measurer can serve many concurrent layout runs.
#[derive(Clone)]
pub struct CosmicTextMeasurer {
    font_system: Arc<Mutex<FontSystem>>,
}

impl Default for CosmicTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicTextMeasurer {
    /// Create a new measurer with a freshly discovered font system.
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }
}

impl TextMeasurer for CosmicTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        let mut font_system = self.font_system.lock().unwrap();

        // Convert font size from points to pixels (roughly 1.33x multiplier for standard DPI)
        let font_size_px = font.size() * 1.33;
        let line_height = font_size_px * 1.2;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(font.family()));

        // Unlimited buffer size so the text flows naturally, one run per line
        buffer.set_size(None, None);

        // Advanced shaping handles ligatures, kerning, etc.
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if !layout_runs.is_empty() {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                // Rightmost glyph position of this run
                if let Some(last) = last {
                    let run_width = last.x + last.w;
                    max_width = max_width.max(run_width);
                }
                total_height += metrics.line_height;
            }
        } else {
            // Fallback estimate when no runs are available
            max_width = text.len() as f32 * (font_size_px * 0.6);
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

/// Deterministic text measurement with fixed per-character metrics.
///
/// Every character is `char_width` wide and every line is `line_height`
/// tall, independent of the font. Intended for layout tests where exact,
/// reproducible geometry matters more than typographic fidelity.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasurer {
    char_width: f32,
    line_height: f32,
}

impl FixedMeasurer {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, text: &str, _font: &FontSpec) -> Size {
        let mut max_chars = 0;
        let mut lines = 0;
        for line in text.split('\n') {
            max_chars = max_chars.max(line.chars().count());
            lines += 1;
        }
        Size::new(
            max_chars as f32 * self.char_width,
            lines as f32 * self.line_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_fixed_measurer_single_line() {
        let measurer = FixedMeasurer::new(10.0, 20.0);
        let size = measurer.measure("hello", &FontSpec::default());
        assert_approx_eq!(f32, size.width(), 50.0);
        assert_approx_eq!(f32, size.height(), 20.0);
    }

    #[test]
    fn test_fixed_measurer_multi_line() {
        let measurer = FixedMeasurer::new(10.0, 20.0);
        let size = measurer.measure("hi\nthere", &FontSpec::default());
        assert_approx_eq!(f32, size.width(), 50.0);
        assert_approx_eq!(f32, size.height(), 40.0);
    }

    #[test]
    fn test_cosmic_measurer_monotonic_width() {
        let measurer = CosmicTextMeasurer::new();
        let font = FontSpec::default();
        let short = measurer.measure("hi", &font);
        let long = measurer.measure("hi there, a much longer message", &font);
        assert!(long.width() > short.width());
        assert!(short.height() > 0.0);
    }

    #[test]
    fn test_cosmic_measurer_multi_line_taller() {
        let measurer = CosmicTextMeasurer::new();
        let font = FontSpec::default();
        let one = measurer.measure("line", &font);
        let two = measurer.measure("line\nline", &font);
        assert!(two.height() > one.height());
    }
}
