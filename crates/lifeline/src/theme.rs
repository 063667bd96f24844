//! Visual themes for rendered diagrams.
//!
//! A [`Theme`] decides the outline geometry of every line and box as SVG
//! path data: ruler-straight for [`PlainTheme`], hand-drawn for
//! [`SketchTheme`]. Stroke, fill, and arrowheads are applied by the
//! exporter, so themes stay purely geometric.

use std::fmt::Write;

use rand::{Rng, RngExt};

use lifeline_core::geometry::{Point, Rect};

/// Produces the path outlines every diagram element is built from.
pub trait Theme {
    /// Path data for a line from `from` to `to`.
    fn line_path(&self, from: Point, to: Point) -> String;

    /// Path data for a closed rectangle outline.
    fn rect_path(&self, rect: Rect) -> String;
}

/// Crisp, straight-edged rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTheme;

impl Theme for PlainTheme {
    fn line_path(&self, from: Point, to: Point) -> String {
        format!("M{},{} L{},{}", from.x(), from.y(), to.x(), to.y())
    }

    fn rect_path(&self, rect: Rect) -> String {
        format!(
            "M{},{} L{},{} L{},{} L{},{} z",
            rect.x(),
            rect.y(),
            rect.max_x(),
            rect.y(),
            rect.max_x(),
            rect.max_y(),
            rect.x(),
            rect.max_y()
        )
    }
}

/// Hand-drawn rendering: every edge becomes a slightly wobbly cubic curve.
///
/// Each shape is perturbed independently, so two renders of the same layout
/// differ. The perturbation scales with edge length and never exceeds a few
/// pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct SketchTheme;

impl SketchTheme {
    /// A cubic curve command from `from` to `to` with randomized control
    /// points near the straight line between them.
    fn wobble(rng: &mut impl Rng, from: Point, to: Point) -> String {
        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
        let factor = (dx * dx + dy * dy).sqrt() / 25.0;

        let r1: f32 = rng.random_range(0.2..0.8);
        let r2: f32 = rng.random_range(0.2..0.8);
        let x_factor = if rng.random::<bool>() { factor } else { -factor };
        let y_factor = if rng.random::<bool>() { factor } else { -factor };

        let p1 = Point::new(dx * r1 + from.x() + x_factor, dy * r1 + from.y() + y_factor);
        let p2 = Point::new(dx * r2 + from.x() - x_factor, dy * r2 + from.y() - y_factor);

        format!(
            "C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            p1.x(),
            p1.y(),
            p2.x(),
            p2.y(),
            to.x(),
            to.y()
        )
    }

    fn wobbly_path(points: &[Point]) -> String {
        let mut rng = rand::rng();
        let mut data = format!("M{:.1},{:.1}", points[0].x(), points[0].y());
        for pair in points.windows(2) {
            // Infallible for String.
            let _ = write!(data, " {}", Self::wobble(&mut rng, pair[0], pair[1]));
        }
        data
    }
}

impl Theme for SketchTheme {
    fn line_path(&self, from: Point, to: Point) -> String {
        Self::wobbly_path(&[from, to])
    }

    fn rect_path(&self, rect: Rect) -> String {
        Self::wobbly_path(&[
            Point::new(rect.x(), rect.y()),
            Point::new(rect.max_x(), rect.y()),
            Point::new(rect.max_x(), rect.max_y()),
            Point::new(rect.x(), rect.max_y()),
            Point::new(rect.x(), rect.y()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_is_straight() {
        let data = PlainTheme.line_path(Point::new(0.0, 0.0), Point::new(10.0, 4.0));
        assert_eq!(data, "M0,0 L10,4");
    }

    #[test]
    fn test_plain_rect_is_closed() {
        let data = PlainTheme.rect_path(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert!(data.starts_with("M1,2"));
        assert!(data.ends_with('z'));
        assert_eq!(data.matches('L').count(), 3);
    }

    #[test]
    fn test_sketch_line_is_a_cubic_curve() {
        let data = SketchTheme.line_path(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(data.starts_with('M'));
        assert!(data.contains('C'), "expected a cubic curve command: {data}");
    }

    #[test]
    fn test_sketch_rect_has_four_edges() {
        let data = SketchTheme.rect_path(Rect::new(0.0, 0.0, 50.0, 30.0));
        assert_eq!(data.matches('C').count(), 4);
    }

    #[test]
    fn test_sketch_curve_ends_on_target() {
        let data = SketchTheme.line_path(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert!(data.ends_with("100.0,50.0"), "curve should land exactly: {data}");
    }

    #[test]
    fn test_wobble_stays_near_the_edge() {
        let mut rng = rand::rng();
        for _ in 0..32 {
            let curve =
                SketchTheme::wobble(&mut rng, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
            let coords: Vec<f32> = curve[1..]
                .split([' ', ','])
                .map(|part| part.parse().unwrap())
                .collect();
            // Control points must stay within the wobble factor (length / 25).
            assert!(coords[1].abs() <= 4.05, "control point too far: {curve}");
            assert!(coords[3].abs() <= 4.05, "control point too far: {curve}");
        }
    }
}
