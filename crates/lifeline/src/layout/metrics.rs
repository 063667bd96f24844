//! Fixed spacing constants for the layout engine.

use serde::Deserialize;

/// The spacing constants that drive every layout computation.
///
/// All values are in diagram units (pixels at 1:1 scale). The defaults
/// reproduce the classic sequence-diagram look; overriding individual
/// fields stretches or tightens the corresponding part of the diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Outer margin around the whole diagram.
    pub diagram_margin: f32,
    /// Margin between an actor's outer box edge and its drawn rectangle.
    pub actor_margin: f32,
    /// Padding between an actor's drawn rectangle and its label.
    pub actor_padding: f32,
    /// Margin around a signal's text block.
    pub signal_margin: f32,
    /// Padding around a signal's text block.
    pub signal_padding: f32,
    /// Margin around a note's outer box.
    pub note_margin: f32,
    /// Padding between a note's drawn rectangle and its text.
    pub note_padding: f32,
    /// How far a two-actor `over` note may overlap the actors' padding.
    pub note_overlap: f32,
    /// Margin around the title box.
    pub title_margin: f32,
    /// Padding between the title box and its text.
    pub title_padding: f32,
    /// Horizontal extent of the self-signal loop.
    pub self_signal_width: f32,
    /// Width of an execution activation bar.
    pub execution_width: f32,
    /// Horizontal offset between nested activation bars.
    pub execution_offset: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            diagram_margin: 10.0,
            actor_margin: 10.0,
            actor_padding: 10.0,
            signal_margin: 5.0,
            signal_padding: 5.0,
            note_margin: 10.0,
            note_padding: 5.0,
            note_overlap: 15.0,
            title_margin: 0.0,
            title_padding: 5.0,
            self_signal_width: 20.0,
            execution_width: 10.0,
            execution_offset: 5.0,
        }
    }
}

impl Metrics {
    /// X-offset of the left edge of an activation bar at nesting `level`,
    /// relative to the lifeline centerline. Zero when no execution is open.
    pub fn execution_margin_left(&self, level: i32) -> f32 {
        if level < 0 {
            return 0.0;
        }
        -self.execution_width / 2.0 + level as f32 * self.execution_offset
    }

    /// X-offset of the right edge of an activation bar at nesting `level`,
    /// relative to the lifeline centerline. Zero when no execution is open.
    pub fn execution_margin_right(&self, level: i32) -> f32 {
        if level < 0 {
            return 0.0;
        }
        self.execution_width / 2.0 + level as f32 * self.execution_offset
    }
}
