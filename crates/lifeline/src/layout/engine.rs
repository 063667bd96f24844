//! Two-pass layout computation.
//!
//! Pass 1 measures every text block and accumulates, per pair of actor
//! indices, the minimum horizontal distance the entries between them demand.
//! Pass 2 walks the actors left to right and pushes each one far enough
//! right to satisfy every recorded distance. A final vertical walk assigns
//! each entry its y span and resolves execution bars into pixel rects.

use std::collections::BTreeMap;

use log::debug;

use lifeline_core::{
    font::FontSpec,
    geometry::{Point, Rect, Size},
    semantic::{Actor, Diagram, Entry, NotePlacement, Signal},
    text::TextMeasurer,
};

use super::{
    ActorLayout, EntryLayout, LabeledBox, Layout, Metrics, SelfSignalLayout, Segment,
    SignalLayout, TextAlign, TextLayout,
};

/// Working geometry for one actor during the horizontal passes.
struct ActorBox {
    x: f32,
    width: f32,
    height: f32,
    padding_right: f32,
    text: Size,
    /// Minimum center-gap demanded towards each later actor index.
    distances: BTreeMap<usize, f32>,
}

impl ActorBox {
    fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Measured dimensions of one sequence entry.
struct SizedEntry {
    width: f32,
    height: f32,
    text: Size,
}

/// Record a minimum distance between two actor indices.
///
/// A virtual index on the far left (`a < 0`) turns into a left inset on
/// actor `b`; one past the far right turns into right padding on actor `a`.
fn ensure_distance(boxes: &mut [ActorBox], a: isize, b: isize, d: f32) {
    debug_assert!(a < b);

    if a < 0 {
        let right = &mut boxes[b as usize];
        right.x = (d - right.width / 2.0).max(right.x);
    } else if b as usize >= boxes.len() {
        let left = &mut boxes[a as usize];
        left.padding_right = d.max(left.padding_right);
    } else {
        let slot = boxes[a as usize].distances.entry(b as usize).or_insert(0.0);
        *slot = d.max(*slot);
    }
}

/// Computes a [`Layout`] from a semantic diagram.
pub struct Engine<'a> {
    metrics: Metrics,
    font: FontSpec,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> Engine<'a> {
    pub fn new(metrics: Metrics, font: FontSpec, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            metrics,
            font,
            measurer,
        }
    }

    fn measure(&self, text: &str) -> Size {
        self.measurer.measure(text, &self.font)
    }

    /// Lay out the whole diagram.
    pub fn layout(&self, diagram: &Diagram) -> Layout {
        let m = &self.metrics;

        // Title sizing; the title also sets a minimum diagram width.
        let title_sized = diagram.title().map(|title| {
            let text = self.measure(title.message());
            let pad = (m.title_padding + m.title_margin) * 2.0;
            (text, text.width() + pad, text.height() + pad)
        });
        let title_height = title_sized.as_ref().map_or(0.0, |(_, _, h)| *h);
        let min_width = title_sized.as_ref().map_or(0.0, |(_, w, _)| *w);

        // Actor intrinsic boxes; right padding reserves room for trailing
        // execution bars so they never cross into the neighboring lifeline.
        let mut boxes: Vec<ActorBox> = diagram
            .actors()
            .iter()
            .map(|actor| {
                let text = self.measure(actor.display_name());
                let pad = (m.actor_padding + m.actor_margin) * 2.0;
                let padding_right = if actor.max_level() >= 0 {
                    m.execution_width / 2.0 + actor.max_level() as f32 * m.execution_offset
                } else {
                    0.0
                };
                ActorBox {
                    x: 0.0,
                    width: text.width() + pad,
                    height: text.height() + pad,
                    padding_right,
                    text,
                    distances: BTreeMap::new(),
                }
            })
            .collect();
        let actors_height = boxes.iter().map(|b| b.height).fold(0.0f32, f32::max);

        // Pass 1: size every entry and accumulate pairwise distances.
        let mut sized = Vec::with_capacity(diagram.sequence().len());
        let mut signals_height = 0.0;
        for entry in diagram.sequence() {
            let entry_size = match entry {
                Entry::Signal(signal) => {
                    let text = self.measure(signal.message());
                    let pad = (m.signal_margin + m.signal_padding) * 2.0;
                    let mut width = text.width() + pad;
                    let height = text.height() + pad;
                    if signal.is_self() {
                        width += m.self_signal_width;
                        let a = signal.source().index() as isize;
                        ensure_distance(&mut boxes, a, a + 1, width);
                    } else {
                        let a = signal.source().index().min(signal.destination().index());
                        let b = signal.source().index().max(signal.destination().index());
                        ensure_distance(&mut boxes, a as isize, b as isize, width);
                    }
                    SizedEntry {
                        width,
                        height,
                        text,
                    }
                }
                Entry::Note(note) => {
                    let text = self.measure(note.message());
                    let pad = (m.note_margin + m.note_padding) * 2.0;
                    let width = text.width() + pad;
                    let height = text.height() + pad;
                    // Notes beside an actor also span the actor's margin.
                    let beside_extra = 2.0 * m.actor_margin;
                    let anchor = note.actor().index() as isize;
                    match (note.placement(), note.second_actor()) {
                        (NotePlacement::LeftOf, _) => {
                            ensure_distance(&mut boxes, anchor - 1, anchor, width + beside_extra);
                        }
                        (NotePlacement::RightOf, _) => {
                            ensure_distance(&mut boxes, anchor, anchor + 1, width + beside_extra);
                        }
                        (NotePlacement::Over, Some(second)) => {
                            let other = second.index() as isize;
                            // Spanning notes may overlap the actors' padding.
                            let overlap = m.note_padding * 2.0 + m.note_overlap * 2.0;
                            ensure_distance(
                                &mut boxes,
                                anchor.min(other),
                                anchor.max(other),
                                width - overlap,
                            );
                        }
                        (NotePlacement::Over, None) => {
                            ensure_distance(&mut boxes, anchor - 1, anchor, width / 2.0);
                            ensure_distance(&mut boxes, anchor, anchor + 1, width / 2.0);
                        }
                    }
                    SizedEntry {
                        width,
                        height,
                        text,
                    }
                }
                Entry::Appearance(index) => {
                    // The late-start marker reserves room for the actor's box.
                    let actor_box = &boxes[index.index()];
                    let (width, height, text) =
                        (actor_box.width, actor_box.height, actor_box.text);
                    ensure_distance(
                        &mut boxes,
                        index.index() as isize,
                        index.index() as isize + 1,
                        width,
                    );
                    SizedEntry {
                        width,
                        height,
                        text,
                    }
                }
            };
            signals_height += entry_size.height;
            sized.push(entry_size);
        }

        // Pass 2: absolute placement, left to right.
        let mut cursor = 0.0;
        for i in 0..boxes.len() {
            boxes[i].x = boxes[i].x.max(cursor);
            let (a_x, a_half) = (boxes[i].x, boxes[i].width / 2.0);
            let demands: Vec<(usize, f32)> =
                boxes[i].distances.iter().map(|(&b, &d)| (b, d)).collect();
            for (b, d) in demands {
                let b_half = boxes[b].width / 2.0;
                let d = d.max(a_half).max(b_half);
                boxes[b].x = boxes[b].x.max(a_x + a_half + d - b_half);
            }
            cursor = boxes[i].x + boxes[i].width + boxes[i].padding_right;
        }

        let width = cursor.max(min_width) + 2.0 * m.diagram_margin;
        let height =
            title_height + 2.0 * m.diagram_margin + 2.0 * actors_height + signals_height;
        debug!(width, height, actors = boxes.len(); "layout dimensions computed");

        // Vertical walk: absolute top y of each entry, and the y span each
        // signal occupies (used to anchor execution bars).
        let body_top = m.diagram_margin + title_height + actors_height;
        // One extra slot: a destroy at the very end of the sequence stamps
        // end_entry == sequence length.
        let mut entry_tops = Vec::with_capacity(sized.len() + 1);
        let mut y = body_top;
        for entry_size in &sized {
            entry_tops.push(y);
            y += entry_size.height;
        }
        entry_tops.push(y);
        let signal_spans: Vec<Option<(f32, f32)>> = diagram
            .sequence()
            .iter()
            .zip(sized.iter().zip(entry_tops.iter()))
            .map(|(entry, (entry_size, &top))| match entry {
                Entry::Signal(signal) if signal.is_self() => {
                    Some((top + m.signal_margin, top + entry_size.height))
                }
                Entry::Signal(_) => {
                    let line_y =
                        top + entry_size.height - m.signal_margin - m.signal_padding;
                    Some((line_y, line_y))
                }
                _ => None,
            })
            .collect();

        let y0 = m.diagram_margin + title_height;
        let actors = diagram
            .actors()
            .iter()
            .zip(boxes.iter())
            .map(|(actor, actor_box)| {
                self.layout_actor(
                    actor,
                    actor_box,
                    y0,
                    actors_height,
                    signals_height,
                    &entry_tops,
                    &signal_spans,
                )
            })
            .collect();

        let mut entries = Vec::new();
        for ((entry, entry_size), &top) in diagram
            .sequence()
            .iter()
            .zip(sized.iter())
            .zip(entry_tops.iter())
        {
            match entry {
                Entry::Signal(signal) if signal.is_self() => {
                    entries.push(EntryLayout::SelfSignal(self.layout_self_signal(
                        signal, entry_size, top, &boxes,
                    )));
                }
                Entry::Signal(signal) => {
                    entries.push(EntryLayout::Signal(self.layout_signal(
                        signal, entry_size, top, &boxes,
                    )));
                }
                Entry::Note(note) => {
                    let a_cx = boxes[note.actor().index()].center_x();
                    let (x, width) = match (note.placement(), note.second_actor()) {
                        (NotePlacement::RightOf, _) => (a_cx + m.actor_margin, entry_size.width),
                        (NotePlacement::LeftOf, _) => {
                            (a_cx - m.actor_margin - entry_size.width, entry_size.width)
                        }
                        (NotePlacement::Over, Some(second)) => {
                            let b_cx = boxes[second.index()].center_x();
                            let overlap = m.note_overlap + m.note_padding;
                            let x = a_cx.min(b_cx) - overlap;
                            (x, a_cx.max(b_cx) + overlap - x)
                        }
                        (NotePlacement::Over, None) => {
                            (a_cx - entry_size.width / 2.0, entry_size.width)
                        }
                    };
                    let rect = Rect::new(
                        x + m.note_margin,
                        top + m.note_margin,
                        width - 2.0 * m.note_margin,
                        entry_size.height - 2.0 * m.note_margin,
                    );
                    let text = TextLayout::new(
                        note.message(),
                        Point::new(
                            x + m.note_margin + m.note_padding,
                            top + m.note_margin + m.note_padding,
                        ),
                        entry_size.text,
                        TextAlign::Left,
                    );
                    entries.push(EntryLayout::Note(LabeledBox::new(rect, text)));
                }
                // Drawn as the actor's top box, placed by layout_actor.
                Entry::Appearance(_) => {}
            }
        }

        let title = diagram.title().zip(title_sized).map(|(title, (text, w, h))| {
            let origin = m.diagram_margin + m.title_margin;
            let rect = Rect::new(
                origin,
                origin,
                w - 2.0 * m.title_margin,
                h - 2.0 * m.title_margin,
            );
            let text = TextLayout::new(
                title.message(),
                Point::new(origin + m.title_padding, origin + m.title_padding),
                text,
                TextAlign::Left,
            );
            LabeledBox::new(rect, text)
        });

        Layout::new(Size::new(width, height), title, actors, entries)
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_actor(
        &self,
        actor: &Actor,
        actor_box: &ActorBox,
        y0: f32,
        actors_height: f32,
        signals_height: f32,
        entry_tops: &[f32],
        signal_spans: &[Option<(f32, f32)>],
    ) -> ActorLayout {
        let m = &self.metrics;
        let cx = actor_box.center_x();

        let top_y = if actor.start_entry() > 0 {
            entry_tops[actor.start_entry()]
        } else {
            y0
        };
        let top = self.actor_box_at(actor, actor_box, top_y, actors_height);

        // A destroyed actor's lifeline stops at its destroy entry and it has
        // no bottom box; open execution bars close at the lifeline's end.
        let (bottom, lifeline_end, bar_anchor) = match actor.end_entry() {
            None => {
                let bottom_y = y0 + actors_height + signals_height;
                let bottom = self.actor_box_at(actor, actor_box, bottom_y, actors_height);
                (Some(bottom), bottom_y + m.actor_margin, bottom_y)
            }
            Some(end) => {
                let end_y = entry_tops[end] - (m.signal_margin + m.signal_padding) * 2.0
                    + m.actor_margin;
                (None, end_y, end_y)
            }
        };

        let lifeline = Segment::new(
            Point::new(cx, top_y + actors_height - m.actor_margin),
            Point::new(cx, lifeline_end),
        );

        let bars = actor
            .executions()
            .iter()
            .filter_map(|execution| {
                let x = cx + execution.level() as f32 * m.execution_offset
                    - m.execution_width / 2.0;
                let (open_start, open_end) = signal_spans[execution.opened_by()]?;
                let (y, h) = if execution.closed_by() == Some(execution.opened_by()) {
                    (open_start, open_end - open_start)
                } else {
                    let bottom = execution
                        .closed_by()
                        .and_then(|closed| signal_spans[closed])
                        .map_or(bar_anchor, |(start, _)| start);
                    (open_end, bottom - open_end)
                };
                Some(Rect::new(x, y, m.execution_width, h))
            })
            .collect();

        ActorLayout::new(top, bottom, lifeline, bars)
    }

    fn actor_box_at(
        &self,
        actor: &Actor,
        actor_box: &ActorBox,
        y: f32,
        actors_height: f32,
    ) -> LabeledBox {
        let m = &self.metrics;
        let rect = Rect::new(
            actor_box.x + m.actor_margin,
            y + m.actor_margin,
            actor_box.width - 2.0 * m.actor_margin,
            actors_height - 2.0 * m.actor_margin,
        );
        let text = TextLayout::new(
            actor.display_name(),
            Point::new(actor_box.center_x(), y + actors_height / 2.0),
            actor_box.text,
            TextAlign::Center,
        );
        LabeledBox::new(rect, text)
    }

    fn layout_signal(
        &self,
        signal: &Signal,
        entry_size: &SizedEntry,
        top: f32,
        boxes: &[ActorBox],
    ) -> SignalLayout {
        let m = &self.metrics;
        let mut a_x = boxes[signal.source().index()].center_x();
        let mut b_x = boxes[signal.destination().index()].center_x();

        // Signals meet the edge of any open activation bar, not the center.
        if b_x > a_x {
            a_x += m.execution_margin_right(signal.start_level());
            b_x += m.execution_margin_left(signal.end_level());
        } else {
            a_x += m.execution_margin_left(signal.start_level());
            b_x += m.execution_margin_right(signal.end_level());
        }

        let text = TextLayout::new(
            signal.message(),
            Point::new(
                (a_x + b_x) / 2.0,
                top + m.signal_margin + 2.0 * m.signal_padding,
            ),
            entry_size.text,
            TextAlign::Center,
        );

        let line_y = top + entry_size.height - m.signal_margin - m.signal_padding;
        SignalLayout::new(
            Segment::new(Point::new(a_x, line_y), Point::new(b_x, line_y)),
            signal.line_style(),
            signal.head(),
            signal.left_head(),
            text,
        )
    }

    fn layout_self_signal(
        &self,
        signal: &Signal,
        entry_size: &SizedEntry,
        top: f32,
        boxes: &[ActorBox],
    ) -> SelfSignalLayout {
        let m = &self.metrics;
        let cx = boxes[signal.source().index()].center_x();
        let loop_x = cx + m.execution_margin_right(signal.max_level()) + m.self_signal_width;

        let x1 = cx + m.execution_margin_right(signal.start_level());
        let x2 = cx + m.execution_margin_right(signal.end_level());
        let y1 = top + m.signal_margin + m.signal_padding;
        let y2 = y1 + entry_size.height - 2.0 * m.signal_margin - m.signal_padding;

        let text = TextLayout::new(
            signal.message(),
            Point::new(
                loop_x + m.signal_padding,
                top + m.signal_padding + (entry_size.height - entry_size.text.height()) / 2.0,
            ),
            entry_size.text,
            TextAlign::Left,
        );

        SelfSignalLayout::new(
            [
                Segment::new(Point::new(x1, y1), Point::new(loop_x, y1)),
                Segment::new(Point::new(loop_x, y1), Point::new(loop_x, y2)),
                Segment::new(Point::new(loop_x, y2), Point::new(x2, y2)),
            ],
            signal.line_style(),
            signal.head(),
            text,
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use lifeline_core::text::FixedMeasurer;

    use super::*;

    // 8px per character, 16px per line: geometry is exact by hand.
    fn layout_source(source: &str) -> Layout {
        let diagram = lifeline_parser::parse(source).expect("source should parse");
        let measurer = FixedMeasurer::new(8.0, 16.0);
        let engine = Engine::new(Metrics::default(), FontSpec::default(), &measurer);
        engine.layout(&diagram)
    }

    #[test]
    fn test_two_actor_geometry() {
        let layout = layout_source("Alice->Bob: Hello");

        // Alice: 5 chars -> 40x16 text -> 80x56 box. Bob: 24 -> 64x56.
        // The signal demands 60 between centers, which wins over half-widths.
        assert_approx_eq!(f32, layout.size().width(), 164.0);
        assert_approx_eq!(f32, layout.size().height(), 168.0);

        let alice = &layout.actors()[0];
        assert_eq!(alice.top().rect(), Rect::new(10.0, 20.0, 60.0, 36.0));
        assert_eq!(alice.top().text().text(), "Alice");
        assert_approx_eq!(f32, alice.lifeline().from().x(), 40.0);

        let bob = &layout.actors()[1];
        assert_approx_eq!(f32, bob.top().rect().x(), 90.0);
        assert_approx_eq!(f32, bob.lifeline().from().x(), 112.0);
    }

    #[test]
    fn test_signal_line_position() {
        let layout = layout_source("Alice->Bob: Hello");

        match &layout.entries()[0] {
            EntryLayout::Signal(signal) => {
                assert_approx_eq!(f32, signal.line().from().x(), 40.0);
                assert_approx_eq!(f32, signal.line().to().x(), 112.0);
                assert_approx_eq!(f32, signal.line().from().y(), 92.0);
                assert_approx_eq!(f32, signal.text().anchor().x(), 76.0);
                assert_approx_eq!(f32, signal.text().anchor().y(), 81.0);
            }
            other => panic!("expected signal, got {other:?}"),
        }
    }

    #[test]
    fn test_center_distance_covers_text() {
        let layout =
            layout_source("A->B: a rather long message that forces the actors apart");

        let centers: Vec<f32> = layout
            .actors()
            .iter()
            .map(|actor| actor.lifeline().from().x())
            .collect();
        let text_width = match &layout.entries()[0] {
            EntryLayout::Signal(signal) => signal.text().size().width(),
            other => panic!("expected signal, got {other:?}"),
        };
        assert!(centers[1] - centers[0] >= text_width);
    }

    #[test]
    fn test_execution_bar_spans_open_to_close() {
        let layout = layout_source("Alice-->+Bob: start\nBob-->-Alice: done");

        let bob = &layout.actors()[1];
        assert_eq!(bob.bars().len(), 1);
        let bar = bob.bars()[0];
        assert_approx_eq!(f32, bar.width(), 10.0);
        // Opens at the first signal's line, closes at the second one's.
        assert_approx_eq!(f32, bar.y(), 92.0);
        assert_approx_eq!(f32, bar.height(), 36.0);
        // Level 0 bars are centered on the lifeline.
        assert_approx_eq!(f32, bar.center().x(), bob.lifeline().from().x());
    }

    #[test]
    fn test_open_execution_runs_to_bottom() {
        let layout = layout_source("Alice->+Bob: go");

        let bob = &layout.actors()[1];
        let bar = bob.bars()[0];
        let bottom_box_top = bob.bottom().expect("bob is not destroyed").rect().y();
        // Never closed: the bar stops at the bottom box's outer edge.
        assert_approx_eq!(f32, bar.max_y(), bottom_box_top - 10.0);
    }

    #[test]
    fn test_destroyed_actor_has_no_bottom_box() {
        let layout = layout_source("Alice->Bob: hi\ndestroy Bob");

        let bob = &layout.actors()[1];
        assert!(bob.bottom().is_none());
        let alice = &layout.actors()[0];
        assert!(
            bob.lifeline().to().y() < alice.lifeline().to().y(),
            "destroyed lifeline should stop early"
        );
    }

    #[test]
    fn test_late_start_actor_box_dropped_down() {
        let layout = layout_source("Alice->Bob: hi\nAlice->*Carol: welcome");

        let alice = &layout.actors()[0];
        let carol = &layout.actors()[2];
        assert!(
            carol.top().rect().y() > alice.top().rect().y(),
            "late-start actor's box should sit below the top row"
        );
    }

    #[test]
    fn test_self_signal_loop() {
        let layout = layout_source("Alice->Alice: think");

        match &layout.entries()[0] {
            EntryLayout::SelfSignal(signal) => {
                let [out, down, back] = signal.segments();
                assert_approx_eq!(f32, out.from().y(), out.to().y());
                assert_approx_eq!(f32, down.from().x(), down.to().x());
                assert_approx_eq!(f32, back.from().y(), back.to().y());
                // The loop reaches self_signal_width past the lifeline.
                assert_approx_eq!(f32, down.from().x() - out.from().x(), 20.0);
                assert!(signal.text().anchor().x() > down.from().x());
            }
            other => panic!("expected self signal, got {other:?}"),
        }
    }

    #[test]
    fn test_note_over_two_actors_spans_both() {
        let layout = layout_source("Alice->Bob: hi\nnote over Alice, Bob: spans");

        match &layout.entries()[1] {
            EntryLayout::Note(note) => {
                let alice_x = layout.actors()[0].lifeline().from().x();
                let bob_x = layout.actors()[1].lifeline().from().x();
                assert!(note.rect().x() < alice_x);
                assert!(note.rect().max_x() > bob_x);
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn test_note_left_of_first_actor_stays_in_frame() {
        let layout = layout_source("note left of Alice: way out west\nAlice->Bob: hi");

        match &layout.entries()[0] {
            EntryLayout::Note(note) => {
                assert!(note.rect().x() >= 0.0);
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn test_title_reserves_vertical_space() {
        let plain = layout_source("Alice->Bob: hi");
        let titled = layout_source("title: Greetings\nAlice->Bob: hi");

        let title = titled.title().expect("expected a title box");
        assert_eq!(title.text().text(), "Greetings");
        assert_approx_eq!(f32, title.rect().x(), 10.0);
        assert!(titled.size().height() > plain.size().height());
        // Everything below shifts down by the title's height.
        let shift = titled.actors()[0].top().rect().y() - plain.actors()[0].top().rect().y();
        assert!(shift > 0.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let source = "title: t\nA->+B: one\nB-->-A: two\nnote over A: hm";
        assert_eq!(layout_source(source), layout_source(source));
    }

    #[test]
    fn test_layout_is_idempotent_for_one_diagram() {
        let source = "title: t\nA->+B: one\nB->B: think\nB-->-A: two\nnote over A: hm";
        let diagram = lifeline_parser::parse(source).expect("source should parse");
        let measurer = FixedMeasurer::new(8.0, 16.0);
        let engine = Engine::new(Metrics::default(), FontSpec::default(), &measurer);
        assert_eq!(engine.layout(&diagram), engine.layout(&diagram));
    }

    #[test]
    fn test_empty_diagram() {
        let layout = layout_source("");
        assert!(layout.actors().is_empty());
        assert!(layout.entries().is_empty());
        assert_approx_eq!(f32, layout.size().width(), 20.0);
        assert_approx_eq!(f32, layout.size().height(), 20.0);
    }
}
