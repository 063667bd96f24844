//! SVG rendering of a computed layout.
//!
//! The renderer walks a [`Layout`] in back-to-front order: background,
//! title, actor boxes and lifelines, activation bars, then signals and
//! notes. All shape outlines come from the active [`Theme`]; this module
//! only applies stroke, fill, text, and arrowhead markers.

use log::debug;
use svg::Document;
use svg::node::element::{Definitions, Group, Marker, Path, Rectangle, Text};

use lifeline_core::{
    apply_stroke,
    color::Color,
    draw::{StrokeDefinition, StrokeStyle},
    font::FontSpec,
    semantic::{ArrowHead, LineStyle},
};

use crate::layout::{
    EntryLayout, LabeledBox, Layout, Segment, SelfSignalLayout, SignalLayout, TextAlign,
    TextLayout,
};
use crate::theme::Theme;

fn execution_fill() -> Color {
    Color::new("#e6e6e6").expect("static color string is valid")
}

/// Marker id for the arrowhead at a signal's destination.
fn end_marker_id(head: ArrowHead) -> &'static str {
    match head {
        ArrowHead::Filled => "markerArrowBlock",
        ArrowHead::Open => "markerArrowOpen",
    }
}

/// Marker id for the reverse arrowhead of a bidirectional signal.
fn start_marker_id(head: ArrowHead) -> &'static str {
    match head {
        ArrowHead::Filled => "markerLeftArrowBlock",
        ArrowHead::Open => "markerLeftArrowOpen",
    }
}

fn marker_url(id: &str) -> String {
    format!("url(#{id})")
}

fn stroke_for(line_style: LineStyle) -> StrokeDefinition {
    match line_style {
        LineStyle::Solid => StrokeDefinition::default(),
        // Dotted signals render with the 6,2 dash pattern.
        LineStyle::Dotted => StrokeDefinition::default().with_style(StrokeStyle::Dashed),
    }
}

#[allow(clippy::too_many_arguments)]
fn marker(
    id: &str,
    view_box: &str,
    width: i32,
    height: i32,
    ref_x: f32,
    ref_y: f32,
    path: &str,
) -> Marker {
    Marker::new()
        .set("id", id)
        .set("viewBox", view_box)
        .set("refX", ref_x)
        .set("refY", ref_y)
        .set("markerWidth", width)
        .set("markerHeight", height)
        .set("orient", "auto")
        .add(Path::new().set("d", path).set("fill", "#000000"))
}

fn arrow_markers() -> Definitions {
    Definitions::new()
        .add(marker(
            "markerArrowBlock",
            "0 0 5 5",
            5,
            5,
            5.0,
            2.5,
            "M 0 0 L 5 2.5 L 0 5 z",
        ))
        .add(marker(
            "markerArrowOpen",
            "0 0 9.6 16",
            4,
            16,
            9.6,
            8.0,
            "M 9.6,8 1.92,16 0,13.7 5.76,8 0,2.286 1.92,0 9.6,8 z",
        ))
        .add(marker(
            "markerLeftArrowBlock",
            "0 0 5 5",
            5,
            5,
            0.0,
            2.5,
            "M 0 2.5 L 5 5 L 5 0 z",
        ))
        .add(marker(
            "markerLeftArrowOpen",
            "0 0 9.6 16",
            4,
            16,
            0.0,
            8.0,
            "M 0,8 7.68,16 9.6,13.7 3.84,8 9.6,2.286 7.68,0 0,8 z",
        ))
}

/// Renders a [`Layout`] into an SVG document.
pub struct SvgRenderer<'a> {
    theme: &'a dyn Theme,
    font: FontSpec,
    background: Option<Color>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(theme: &'a dyn Theme, font: FontSpec) -> Self {
        Self {
            theme,
            font,
            background: None,
        }
    }

    /// Fill the whole canvas with `color` before drawing.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn render(&self, layout: &Layout) -> Document {
        let (width, height) = (layout.size().width(), layout.size().height());
        debug!(width, height; "rendering svg document");

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .add(arrow_markers());

        if let Some(color) = self.background {
            document = document.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", color.to_string()),
            );
        }

        if let Some(title) = layout.title() {
            document = document.add(self.labeled_box(title, Color::white()));
        }

        for actor in layout.actors() {
            document = document.add(self.labeled_box(actor.top(), Color::white()));
            if let Some(bottom) = actor.bottom() {
                document = document.add(self.labeled_box(bottom, Color::white()));
            }
            document = document.add(self.segment(
                actor.lifeline(),
                &StrokeDefinition::default(),
            ));
        }

        // Bars go under the signal lines that open and close them.
        for actor in layout.actors() {
            for &bar in actor.bars() {
                document = document.add(self.shape(
                    self.theme.rect_path(bar),
                    &StrokeDefinition::default(),
                    Some(execution_fill()),
                ));
            }
        }

        for entry in layout.entries() {
            document = match entry {
                EntryLayout::Signal(signal) => document.add(self.signal(signal)),
                EntryLayout::SelfSignal(signal) => document.add(self.self_signal(signal)),
                EntryLayout::Note(note) => document.add(self.labeled_box(note, Color::white())),
            };
        }

        document
    }

    pub fn render_to_string(&self, layout: &Layout) -> String {
        self.render(layout).to_string()
    }

    fn shape(&self, data: String, stroke: &StrokeDefinition, fill: Option<Color>) -> Path {
        let path = Path::new().set("d", data).set(
            "fill",
            fill.map_or_else(|| "none".to_string(), |color| color.to_string()),
        );
        apply_stroke!(path, stroke)
    }

    fn segment(&self, segment: Segment, stroke: &StrokeDefinition) -> Path {
        self.shape(
            self.theme.line_path(segment.from(), segment.to()),
            stroke,
            None,
        )
    }

    fn labeled_box(&self, labeled: &LabeledBox, fill: Color) -> Group {
        Group::new()
            .add(self.shape(
                self.theme.rect_path(labeled.rect()),
                &StrokeDefinition::default(),
                Some(fill),
            ))
            .add(self.text(labeled.text()))
    }

    fn text(&self, text: &TextLayout) -> Group {
        let lines: Vec<&str> = text.text().split('\n').collect();
        let line_height = text.size().height() / lines.len() as f32;
        let top = text.top_left().y();
        let anchor = match text.align() {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
        };

        let mut group = Group::new();
        for (i, line) in lines.iter().enumerate() {
            group = group.add(
                Text::new(*line)
                    .set("x", text.anchor().x())
                    .set("y", top + (i as f32 + 0.5) * line_height)
                    .set("text-anchor", anchor)
                    .set("dominant-baseline", "middle")
                    .set("font-family", self.font.family())
                    .set("font-size", self.font.size()),
            );
        }
        group
    }

    fn signal(&self, signal: &SignalLayout) -> Group {
        let stroke = stroke_for(signal.line_style());
        let mut line = self
            .segment(signal.line(), &stroke)
            .set("marker-end", marker_url(end_marker_id(signal.head())));
        if let Some(left) = signal.left_head() {
            line = line.set("marker-start", marker_url(start_marker_id(left)));
        }
        Group::new().add(line).add(self.text(signal.text()))
    }

    fn self_signal(&self, signal: &SelfSignalLayout) -> Group {
        let stroke = stroke_for(signal.line_style());
        let [out, down, back] = signal.segments();
        Group::new()
            .add(self.segment(*out, &stroke))
            .add(self.segment(*down, &stroke))
            .add(
                self.segment(*back, &stroke)
                    .set("marker-end", marker_url(end_marker_id(signal.head()))),
            )
            .add(self.text(signal.text()))
    }
}

#[cfg(test)]
mod tests {
    use lifeline_core::text::FixedMeasurer;

    use crate::layout::{Engine, Metrics};
    use crate::theme::{PlainTheme, SketchTheme};

    use super::*;

    fn render_source(source: &str, theme: &dyn Theme) -> String {
        let diagram = lifeline_parser::parse(source).expect("source should parse");
        let measurer = FixedMeasurer::default();
        let engine = Engine::new(Metrics::default(), FontSpec::default(), &measurer);
        let layout = engine.layout(&diagram);
        SvgRenderer::new(theme, FontSpec::default()).render_to_string(&layout)
    }

    #[test]
    fn test_document_has_dimensions_and_markers() {
        let out = render_source("Alice->Bob: Hello", &PlainTheme);
        assert!(out.starts_with("<svg"));
        assert!(out.contains("viewBox"));
        for id in [
            "markerArrowBlock",
            "markerArrowOpen",
            "markerLeftArrowBlock",
            "markerLeftArrowOpen",
        ] {
            assert!(out.contains(id), "missing marker {id}");
        }
    }

    #[test]
    fn test_filled_arrowhead_uses_block_marker() {
        let out = render_source("Alice->Bob: Hello", &PlainTheme);
        assert!(out.contains("marker-end=\"url(#markerArrowBlock)\""));
    }

    #[test]
    fn test_open_dotted_signal() {
        let out = render_source("Alice-->>Bob: Hello", &PlainTheme);
        assert!(out.contains("marker-end=\"url(#markerArrowOpen)\""));
        assert!(out.contains("stroke-dasharray=\"6,2\""));
    }

    #[test]
    fn test_bidirectional_signal_gets_start_marker() {
        let out = render_source("Alice<->Bob: Hello", &PlainTheme);
        assert!(out.contains("marker-start=\"url(#markerLeftArrowBlock)\""));
    }

    #[test]
    fn test_text_content_present() {
        let out = render_source("title: Greetings\nAlice->Bob: Hello", &PlainTheme);
        assert!(out.contains(">Greetings<"));
        assert!(out.contains(">Alice<"));
        assert!(out.contains(">Hello<"));
    }

    #[test]
    fn test_execution_bar_fill() {
        let out = render_source("Alice->+Bob: go\nBob-->-Alice: done", &PlainTheme);
        assert!(out.contains("fill=\"#e6e6e6\""));
    }

    #[test]
    fn test_background_off_by_default() {
        let out = render_source("Alice->Bob: hi", &PlainTheme);
        assert!(!out.contains("<rect"));
    }

    #[test]
    fn test_background_rect_when_configured() {
        let diagram = lifeline_parser::parse("Alice->Bob: hi").expect("source should parse");
        let measurer = FixedMeasurer::default();
        let engine = Engine::new(Metrics::default(), FontSpec::default(), &measurer);
        let layout = engine.layout(&diagram);
        let out = SvgRenderer::new(&PlainTheme, FontSpec::default())
            .with_background(Color::white())
            .render_to_string(&layout);
        assert!(out.contains("<rect"));
        assert!(out.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_sketch_theme_renders_curves() {
        let out = render_source("Alice->Bob: Hello", &SketchTheme);
        assert!(out.contains('C'), "sketch output should contain cubic curves");
    }

    #[test]
    fn test_font_settings_applied() {
        let diagram = lifeline_parser::parse("Alice->Bob: hi").expect("source should parse");
        let measurer = FixedMeasurer::default();
        let font = FontSpec::new("Courier New", 12.0);
        let engine = Engine::new(Metrics::default(), font.clone(), &measurer);
        let layout = engine.layout(&diagram);
        let out = SvgRenderer::new(&PlainTheme, font).render_to_string(&layout);
        assert!(out.contains("font-family=\"Courier New\""));
        assert!(out.contains("font-size=\"12\""));
    }
}
