//! Drawable object model for committed annotations.

use super::canvas::PixelBuffer;
use super::color::Color;
use super::font::FontDescriptor;
use crate::util::{self, Bounds, Point};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Vertical distance between consecutive text lines, as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

/// Geometric shape tools that draw between a start and an end point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// Single straight segment
    Line,
    /// Segment with a two-stroke head at the end point
    Arrow,
    /// Axis-aligned box from corner to corner
    Rectangle,
    /// Ellipse inscribed in the drag box
    Ellipse,
    /// Box with quarter-curve corners
    RoundedRectangle,
    /// Five-point star centered in the drag box
    Star,
}

/// A committed mark in the annotation log.
///
/// Every variant stores its own bounding box. The box is derived once from the
/// geometry at construction and afterwards only shifted by [`translate`](Self::translate),
/// so repeated drags never accumulate recomputation drift.
#[derive(Clone, Debug)]
pub enum DrawableObject {
    /// Freehand polyline drawn while the pointer was held down
    Stroke {
        /// Points in the order they were traced
        points: Vec<Point>,
        /// Stroke color
        color: Color,
        /// Line thickness in pixels
        thick: f64,
        /// Points' box expanded by half the thickness
        bounds: Bounds,
    },
    /// Geometric shape between two drag points
    Shape {
        kind: ShapeKind,
        start: Point,
        end: Point,
        color: Color,
        thick: f64,
        bounds: Bounds,
    },
    /// Multi-line text; `origin` is the top-left of the first line
    Text {
        origin: Point,
        text: String,
        color: Color,
        /// Font size in pixels
        size: f64,
        font: FontDescriptor,
        /// Measured text extent; degenerate when measurement failed
        bounds: Bounds,
    },
    /// Eraser stroke: clears everything beneath it in z-order
    Erase {
        points: Vec<Point>,
        thick: f64,
        bounds: Bounds,
    },
    /// A marquee region lifted from `source` and placed at `dest`
    Patch {
        source: Bounds,
        dest: Point,
        pixels: Rc<PixelBuffer>,
        bounds: Bounds,
    },
}

impl DrawableObject {
    /// Creates a freehand stroke object.
    pub fn stroke(points: Vec<Point>, color: Color, thick: f64) -> Self {
        let bounds = bounds_for_points(&points, thick);
        Self::Stroke {
            points,
            color,
            thick,
            bounds,
        }
    }

    /// Creates a shape object from its drag points.
    pub fn shape(kind: ShapeKind, start: Point, end: Point, color: Color, thick: f64) -> Self {
        Self::Shape {
            kind,
            start,
            end,
            color,
            thick,
            bounds: bounds_for_shape(kind, start, end, thick),
        }
    }

    /// Creates a text object, measuring its extent with Pango.
    ///
    /// If measurement fails the object keeps a zero-size box: it still renders
    /// but can never be hit.
    pub fn text(
        origin: Point,
        text: String,
        color: Color,
        size: f64,
        font: FontDescriptor,
    ) -> Self {
        let bounds = bounds_for_text(origin, &text, size, &font).unwrap_or_else(|| {
            log::warn!("Could not measure text at {:?}; it will not be selectable", origin);
            Bounds::new(origin.x, origin.y, 0.0, 0.0)
        });
        Self::Text {
            origin,
            text,
            color,
            size,
            font,
            bounds,
        }
    }

    /// Creates an eraser object.
    pub fn erase(points: Vec<Point>, thick: f64) -> Self {
        let bounds = bounds_for_points(&points, thick);
        Self::Erase {
            points,
            thick,
            bounds,
        }
    }

    /// Creates a moved marquee region.
    pub fn patch(source: Bounds, dest: Point, pixels: Rc<PixelBuffer>) -> Self {
        let bounds = source.union(&Bounds::new(dest.x, dest.y, source.w, source.h));
        Self::Patch {
            source,
            dest,
            pixels,
            bounds,
        }
    }

    /// Returns the stored bounding box.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Stroke { bounds, .. }
            | Self::Shape { bounds, .. }
            | Self::Text { bounds, .. }
            | Self::Erase { bounds, .. }
            | Self::Patch { bounds, .. } => *bounds,
        }
    }

    /// Whether the object can be picked by the select tool at all.
    ///
    /// Raster operations (erase, patch) are never selectable, and neither is an
    /// object whose box is degenerate.
    pub fn is_hittable(&self) -> bool {
        match self {
            Self::Stroke { .. } | Self::Shape { .. } | Self::Text { .. } => {
                !self.bounds().is_degenerate()
            }
            Self::Erase { .. } | Self::Patch { .. } => false,
        }
    }

    /// Whether this object hides whatever lies beneath it at `p`.
    ///
    /// Erase strokes clear pixels within half their width of the path; patches
    /// clear their source rectangle and overwrite their destination rectangle.
    pub fn conceals(&self, p: Point) -> bool {
        match self {
            Self::Erase { points, thick, .. } => {
                util::distance_to_polyline(p, points).is_some_and(|d| d <= thick / 2.0)
            }
            Self::Patch { source, dest, .. } => {
                source.contains(p) || Bounds::new(dest.x, dest.y, source.w, source.h).contains(p)
            }
            Self::Stroke { .. } | Self::Shape { .. } | Self::Text { .. } => false,
        }
    }

    /// Whether `later`, committed after this object, has altered its pixels.
    ///
    /// An erase clips an object when its path comes within reach of the
    /// object's painted geometry. A patch clips anything overlapping its source
    /// or destination rectangle. Moving a clipped object would resurrect the
    /// removed pixels, so such objects are left out of hit testing.
    pub fn is_clipped_by(&self, later: &DrawableObject) -> bool {
        if !self.bounds().intersects(&later.bounds()) {
            return false;
        }
        match later {
            Self::Erase { points, thick, .. } => self.touched_by_path(points, thick / 2.0),
            Self::Patch { source, dest, .. } => {
                let own = self.bounds();
                own.intersects(source)
                    || own.intersects(&Bounds::new(dest.x, dest.y, source.w, source.h))
            }
            Self::Stroke { .. } | Self::Shape { .. } | Self::Text { .. } => false,
        }
    }

    /// Whether a path of half-width `radius` overlaps the painted geometry.
    fn touched_by_path(&self, path: &[Point], radius: f64) -> bool {
        let within = |outline: &[Point], reach: f64| {
            util::distance_between_polylines(outline, path).is_some_and(|d| d <= reach)
        };
        match self {
            Self::Stroke { points, thick, .. } => within(points.as_slice(), radius + thick / 2.0),
            Self::Shape {
                kind,
                start,
                end,
                thick,
                ..
            } => shape_paths(*kind, *start, *end, *thick)
                .iter()
                .any(|outline| within(outline.as_slice(), radius + thick / 2.0)),
            // Glyphs fill their box, so any contact with it counts.
            Self::Text { bounds, .. } => {
                let outline = [
                    bounds.origin(),
                    Point::new(bounds.right(), bounds.y),
                    Point::new(bounds.right(), bounds.bottom()),
                    Point::new(bounds.x, bounds.bottom()),
                    bounds.origin(),
                ];
                path.iter().any(|p| bounds.contains(*p)) || within(&outline[..], radius)
            }
            Self::Erase { .. } | Self::Patch { .. } => false,
        }
    }

    /// Translates every coordinate the object owns, and its box, by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Stroke { points, bounds, .. } | Self::Erase { points, bounds, .. } => {
                for point in points.iter_mut() {
                    *point = point.translated(dx, dy);
                }
                *bounds = bounds.translated(dx, dy);
            }
            Self::Shape {
                start, end, bounds, ..
            } => {
                *start = start.translated(dx, dy);
                *end = end.translated(dx, dy);
                *bounds = bounds.translated(dx, dy);
            }
            Self::Text { origin, bounds, .. } => {
                *origin = origin.translated(dx, dy);
                *bounds = bounds.translated(dx, dy);
            }
            Self::Patch {
                source,
                dest,
                bounds,
                ..
            } => {
                *source = source.translated(dx, dy);
                *dest = dest.translated(dx, dy);
                *bounds = bounds.translated(dx, dy);
            }
        }
    }

    /// Returns a translated copy.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut moved = self.clone();
        moved.translate(dx, dy);
        moved
    }

    /// Short label used in log output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stroke { .. } => "stroke",
            Self::Shape { .. } => "shape",
            Self::Text { .. } => "text",
            Self::Erase { .. } => "erase",
            Self::Patch { .. } => "patch",
        }
    }
}

/// Splits text into the lines rendered one below the other.
pub fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.trim_end_matches('\r'))
}

pub(crate) fn bounds_for_points(points: &[Point], thick: f64) -> Bounds {
    match Bounds::enclosing(points) {
        Some(bounds) => bounds.inflated(thick / 2.0),
        None => Bounds::default(),
    }
}

/// Points the renderer visits for a shape, before stroke padding.
pub(crate) fn shape_outline_points(kind: ShapeKind, start: Point, end: Point, thick: f64) -> Vec<Point> {
    match kind {
        ShapeKind::Line
        | ShapeKind::Rectangle
        | ShapeKind::Ellipse
        | ShapeKind::RoundedRectangle => vec![start, end],
        ShapeKind::Arrow => {
            let [left, right] = util::arrowhead_points(start, end, thick);
            vec![start, end, left, right]
        }
        ShapeKind::Star => util::star_vertices(start, end).to_vec(),
    }
}

/// Polylines tracing what the renderer strokes for a shape.
///
/// Ellipses are approximated by a polygon; rounded corners by square ones.
fn shape_paths(kind: ShapeKind, start: Point, end: Point, thick: f64) -> Vec<Vec<Point>> {
    const ELLIPSE_SEGMENTS: usize = 96;

    match kind {
        ShapeKind::Line => vec![vec![start, end]],
        ShapeKind::Arrow => {
            let [left, right] = util::arrowhead_points(start, end, thick);
            vec![vec![start, end], vec![left, end, right]]
        }
        ShapeKind::Rectangle | ShapeKind::RoundedRectangle => {
            let rect = Bounds::from_corners(start, end);
            vec![vec![
                rect.origin(),
                Point::new(rect.right(), rect.y),
                Point::new(rect.right(), rect.bottom()),
                Point::new(rect.x, rect.bottom()),
                rect.origin(),
            ]]
        }
        ShapeKind::Ellipse => {
            let (center, rx, ry) = util::ellipse_params(start, end);
            let outline = (0..=ELLIPSE_SEGMENTS)
                .map(|i| {
                    let angle = i as f64 * std::f64::consts::TAU / ELLIPSE_SEGMENTS as f64;
                    Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
                })
                .collect();
            vec![outline]
        }
        ShapeKind::Star => {
            let vertices = util::star_vertices(start, end);
            let mut outline = vertices.to_vec();
            outline.push(vertices[0]);
            vec![outline]
        }
    }
}

pub(crate) fn bounds_for_shape(kind: ShapeKind, start: Point, end: Point, thick: f64) -> Bounds {
    bounds_for_points(&shape_outline_points(kind, start, end, thick), thick)
}

/// Measures multi-line text with Pango.
///
/// Width is the widest line, height is `lines * size * 1.2`. Returns `None`
/// when no measurement context can be created.
pub(crate) fn bounds_for_text(
    origin: Point,
    text: &str,
    size: f64,
    font: &FontDescriptor,
) -> Option<Bounds> {
    // A tiny image surface is enough; only the layout metrics matter.
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).ok()?;
    let ctx = cairo::Context::new(&surface).ok()?;
    let layout = pangocairo::functions::create_layout(&ctx);
    layout.set_font_description(Some(&font.to_font_description(size)));

    let mut width = 0.0f64;
    let mut lines = 0usize;
    for line in text_lines(text) {
        layout.set_text(line);
        let (line_width, _) = layout.pixel_size();
        width = width.max(line_width as f64);
        lines += 1;
    }

    let height = lines as f64 * size * TEXT_LINE_HEIGHT;
    Some(Bounds::new(origin.x, origin.y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn assert_inside(bounds: Bounds, points: &[Point]) {
        for point in points {
            assert!(
                bounds.contains(*point),
                "{point:?} should lie within {bounds:?}"
            );
        }
    }

    #[test]
    fn stroke_bounds_expand_by_half_width() {
        let stroke = DrawableObject::stroke(vec![p(10.0, 10.0), p(30.0, 10.0), p(50.0, 10.0)], RED, 5.0);
        assert_eq!(stroke.bounds(), Bounds::new(7.5, 7.5, 45.0, 5.0));
    }

    #[test]
    fn shape_bounds_cover_every_rendered_vertex() {
        let cases = [
            (ShapeKind::Line, p(50.0, 40.0), p(70.0, 90.0)),
            (ShapeKind::Arrow, p(100.0, 100.0), p(50.0, 120.0)),
            (ShapeKind::Rectangle, p(80.0, 10.0), p(10.0, 80.0)),
            (ShapeKind::Ellipse, p(0.0, 0.0), p(40.0, 10.0)),
            (ShapeKind::RoundedRectangle, p(5.0, 5.0), p(105.0, 55.0)),
            (ShapeKind::Star, p(0.0, 0.0), p(100.0, 100.0)),
        ];

        for (kind, start, end) in cases {
            let thick = 6.0;
            let shape = DrawableObject::shape(kind, start, end, BLUE, thick);
            let outline = shape_outline_points(kind, start, end, thick);
            assert_inside(shape.bounds().inflated(-thick / 2.0 + 1e-9), &outline);
        }
    }

    #[test]
    fn star_bounds_exceed_the_drag_box() {
        let star = DrawableObject::shape(ShapeKind::Star, p(0.0, 0.0), p(100.0, 100.0), RED, 2.0);
        let bounds = star.bounds();
        // Outer radius is half the diagonal (≈70.7), so the top tip sits above the box.
        assert!(bounds.y < 0.0);
        assert!(bounds.x < 0.0);
    }

    #[test]
    fn arrow_bounds_include_head() {
        let arrow = DrawableObject::shape(ShapeKind::Arrow, p(0.0, 0.0), p(100.0, 0.0), RED, 5.0);
        let bounds = arrow.bounds();
        // Heads reach 7.5px either side of the shaft, plus 2.5px of stroke padding.
        assert!((bounds.y - -10.0).abs() < 1e-9);
        assert!((bounds.h - 20.0).abs() < 1e-9);
    }

    #[test]
    fn translate_is_additive() {
        let original =
            DrawableObject::shape(ShapeKind::Rectangle, p(10.0, 10.0), p(40.0, 30.0), RED, 3.0);

        let stepwise = original.translated(12.5, -3.0).translated(-4.0, 8.0);
        let direct = original.translated(8.5, 5.0);

        match (&stepwise, &direct) {
            (
                DrawableObject::Shape { start: s1, end: e1, .. },
                DrawableObject::Shape { start: s2, end: e2, .. },
            ) => {
                assert_eq!(s1, s2);
                assert_eq!(e1, e2);
            }
            _ => panic!("translation changed the variant"),
        }
        assert_eq!(stepwise.bounds(), direct.bounds());
        assert_eq!(direct.bounds(), original.bounds().translated(8.5, 5.0));
    }

    #[test]
    fn translate_moves_every_stroke_point() {
        let mut stroke = DrawableObject::stroke(vec![p(0.0, 0.0), p(5.0, 5.0)], RED, 2.0);
        stroke.translate(10.0, 20.0);
        if let DrawableObject::Stroke { points, .. } = &stroke {
            assert_eq!(points, &vec![p(10.0, 20.0), p(15.0, 25.0)]);
        } else {
            panic!("expected stroke");
        }
    }

    #[test]
    fn degenerate_objects_are_never_hittable() {
        let text = DrawableObject::Text {
            origin: p(5.0, 5.0),
            text: "unmeasured".to_string(),
            color: RED,
            size: 24.0,
            font: FontDescriptor::default(),
            bounds: Bounds::new(5.0, 5.0, 0.0, 0.0),
        };
        assert!(!text.is_hittable());

        let empty_stroke = DrawableObject::stroke(Vec::new(), RED, 4.0);
        assert!(!empty_stroke.is_hittable());
    }

    #[test]
    fn erase_conceals_points_under_its_path() {
        let erase = DrawableObject::erase(vec![p(0.0, 0.0), p(100.0, 0.0)], 10.0);
        assert!(!erase.is_hittable());
        assert!(erase.conceals(p(50.0, 4.0)));
        assert!(!erase.conceals(p(50.0, 6.0)));
    }

    #[test]
    fn erase_clips_strokes_it_reaches() {
        let stroke = DrawableObject::stroke(vec![p(20.0, 50.0), p(120.0, 50.0)], RED, 2.0);
        let across = DrawableObject::erase(vec![p(70.0, 30.0), p(70.0, 70.0)], 10.0);
        let beside = DrawableObject::erase(vec![p(20.0, 60.0), p(120.0, 60.0)], 10.0);
        assert!(stroke.is_clipped_by(&across));
        // 10 px away, reach is 5 + 1.
        assert!(!stroke.is_clipped_by(&beside));
    }

    #[test]
    fn erase_inside_an_outline_does_not_clip_it() {
        let rect = DrawableObject::shape(ShapeKind::Rectangle, p(0.0, 0.0), p(100.0, 100.0), RED, 4.0);
        let inside = DrawableObject::erase(vec![p(30.0, 50.0), p(70.0, 50.0)], 10.0);
        let over_edge = DrawableObject::erase(vec![p(50.0, 90.0), p(50.0, 110.0)], 10.0);
        assert!(!rect.is_clipped_by(&inside));
        assert!(rect.is_clipped_by(&over_edge));
    }

    #[test]
    fn patch_clips_objects_under_source_or_destination() {
        let pixels = Rc::new(PixelBuffer {
            width: 10,
            height: 10,
            stride: 40,
            data: vec![0; 400],
        });
        let patch = DrawableObject::patch(Bounds::new(0.0, 0.0, 10.0, 10.0), p(50.0, 0.0), pixels);
        let under_source = DrawableObject::stroke(vec![p(5.0, 5.0), p(30.0, 5.0)], BLUE, 2.0);
        let under_dest = DrawableObject::stroke(vec![p(55.0, 5.0), p(80.0, 5.0)], BLUE, 2.0);
        let clear = DrawableObject::stroke(vec![p(20.0, 5.0), p(40.0, 5.0)], BLUE, 2.0);
        assert!(under_source.is_clipped_by(&patch));
        assert!(under_dest.is_clipped_by(&patch));
        assert!(!clear.is_clipped_by(&patch));
    }

    #[test]
    fn text_height_follows_line_count() {
        let text = DrawableObject::text(
            p(10.0, 20.0),
            "one\ntwo\nthree".to_string(),
            RED,
            20.0,
            FontDescriptor::default(),
        );
        let bounds = text.bounds();
        assert_eq!(bounds.x, 10.0);
        assert_eq!(bounds.y, 20.0);
        assert!((bounds.h - 72.0).abs() < 1e-9);
    }

    #[test]
    fn text_lines_split_on_line_breaks() {
        let lines: Vec<_> = text_lines("a\r\nb\n").collect();
        assert_eq!(lines, vec!["a", "b", ""]);
    }
}
