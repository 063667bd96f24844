//! Layout engine for sequence diagrams.
//!
//! [`Engine`] turns a semantic [`Diagram`](lifeline_core::semantic::Diagram)
//! into a [`Layout`]: a fully positioned set of boxes, lines, and text blocks
//! in absolute diagram coordinates. Rendering a layout is a pure read; no
//! theme or exporter ever recomputes geometry.

mod engine;
mod metrics;

pub use engine::Engine;
pub use metrics::Metrics;

use lifeline_core::{
    geometry::{Point, Rect, Size},
    semantic::{ArrowHead, LineStyle},
};

/// How a positioned text block is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// The anchor is the top-left corner of the text block.
    Left,
    /// The anchor is the center of the text block.
    Center,
}

/// A measured text block at an absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    text: String,
    anchor: Point,
    size: Size,
    align: TextAlign,
}

impl TextLayout {
    pub fn new(text: impl Into<String>, anchor: Point, size: Size, align: TextAlign) -> Self {
        Self {
            text: text.into(),
            anchor,
            size,
            align,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Measured size of the whole block, all lines included.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Top-left corner of the block regardless of alignment.
    pub fn top_left(&self) -> Point {
        match self.align {
            TextAlign::Left => self.anchor,
            TextAlign::Center => self.anchor.translate(
                -self.size.width() / 2.0,
                -self.size.height() / 2.0,
            ),
        }
    }
}

/// A straight line segment between two absolute points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    from: Point,
    to: Point,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn from(self) -> Point {
        self.from
    }

    pub fn to(self) -> Point {
        self.to
    }
}

/// A drawn rectangle with a text block inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBox {
    rect: Rect,
    text: TextLayout,
}

impl LabeledBox {
    pub fn new(rect: Rect, text: TextLayout) -> Self {
        Self { rect, text }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn text(&self) -> &TextLayout {
        &self.text
    }
}

/// Everything drawn for one actor: its boxes, lifeline, and activation bars.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorLayout {
    top: LabeledBox,
    /// Absent when the actor was destroyed before the diagram's end.
    bottom: Option<LabeledBox>,
    lifeline: Segment,
    bars: Vec<Rect>,
}

impl ActorLayout {
    pub fn new(
        top: LabeledBox,
        bottom: Option<LabeledBox>,
        lifeline: Segment,
        bars: Vec<Rect>,
    ) -> Self {
        Self {
            top,
            bottom,
            lifeline,
            bars,
        }
    }

    pub fn top(&self) -> &LabeledBox {
        &self.top
    }

    pub fn bottom(&self) -> Option<&LabeledBox> {
        self.bottom.as_ref()
    }

    pub fn lifeline(&self) -> Segment {
        self.lifeline
    }

    /// Activation bars, one rect per execution in open order.
    pub fn bars(&self) -> &[Rect] {
        &self.bars
    }
}

/// A positioned signal between two distinct actors.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalLayout {
    line: Segment,
    line_style: LineStyle,
    head: ArrowHead,
    left_head: Option<ArrowHead>,
    text: TextLayout,
}

impl SignalLayout {
    pub fn new(
        line: Segment,
        line_style: LineStyle,
        head: ArrowHead,
        left_head: Option<ArrowHead>,
        text: TextLayout,
    ) -> Self {
        Self {
            line,
            line_style,
            head,
            left_head,
            text,
        }
    }

    pub fn line(&self) -> Segment {
        self.line
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn head(&self) -> ArrowHead {
        self.head
    }

    pub fn left_head(&self) -> Option<ArrowHead> {
        self.left_head
    }

    pub fn text(&self) -> &TextLayout {
        &self.text
    }
}

/// A positioned self-signal loop: out, down, and back with the arrowhead.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfSignalLayout {
    segments: [Segment; 3],
    line_style: LineStyle,
    head: ArrowHead,
    text: TextLayout,
}

impl SelfSignalLayout {
    pub fn new(
        segments: [Segment; 3],
        line_style: LineStyle,
        head: ArrowHead,
        text: TextLayout,
    ) -> Self {
        Self {
            segments,
            line_style,
            head,
            text,
        }
    }

    /// The three loop segments; the arrowhead goes on the last one.
    pub fn segments(&self) -> &[Segment; 3] {
        &self.segments
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn head(&self) -> ArrowHead {
        self.head
    }

    pub fn text(&self) -> &TextLayout {
        &self.text
    }
}

/// One positioned element of the diagram body, in sequence order.
///
/// Lifecycle markers for late-start actors occupy vertical space during
/// layout but emit no element of their own; the actor's top box is placed
/// at the marker's position instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryLayout {
    Signal(SignalLayout),
    SelfSignal(SelfSignalLayout),
    Note(LabeledBox),
}

/// A complete, absolutely positioned diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    size: Size,
    title: Option<LabeledBox>,
    actors: Vec<ActorLayout>,
    entries: Vec<EntryLayout>,
}

impl Layout {
    pub fn new(
        size: Size,
        title: Option<LabeledBox>,
        actors: Vec<ActorLayout>,
        entries: Vec<EntryLayout>,
    ) -> Self {
        Self {
            size,
            title,
            actors,
            entries,
        }
    }

    /// Total diagram size including outer margins.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn title(&self) -> Option<&LabeledBox> {
        self.title.as_ref()
    }

    /// Actor layouts in declaration order.
    pub fn actors(&self) -> &[ActorLayout] {
        &self.actors
    }

    /// Positioned signals and notes in sequence order.
    pub fn entries(&self) -> &[EntryLayout] {
        &self.entries
    }

    /// True if every coordinate in the layout is finite.
    pub fn is_finite(&self) -> bool {
        self.size.width().is_finite() && self.size.height().is_finite()
    }
}
