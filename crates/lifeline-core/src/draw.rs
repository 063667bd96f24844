//! Drawing definitions shared by rendering themes.

mod stroke;

pub use stroke::{StrokeDefinition, StrokeStyle};
