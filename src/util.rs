//! Geometry helpers, shape construction math, and color name mapping.
//!
//! This module provides:
//! - [`Point`] and [`Bounds`], the coordinate types shared by the object model
//! - Arrowhead, star, rounded-rectangle, and ellipse geometry
//! - Key/name to color mapping used by keybindings and the config file

use crate::draw::{Color, color::*};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Coordinate Types
// ============================================================================

/// A position in surface-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box with a top-left origin and non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Builds the minimal box covering two corners, whatever their order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    /// Builds the minimal box covering every point, or `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Expands the box by `amount` on every side.
    pub fn inflated(&self, amount: f64) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            w: self.w + amount * 2.0,
            h: self.h + amount * 2.0,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest box covering both inputs.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// True when the two boxes share some area; touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when the box encloses no area (never measured, or a zero-length extent).
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

// ============================================================================
// Shape Geometry
// ============================================================================

/// Angle between each arrowhead segment and the shaft, in degrees.
pub const ARROWHEAD_ANGLE_DEGREES: f64 = 30.0;

/// Arrowhead length grows with the stroke so heavy arrows keep visible heads.
pub fn arrowhead_length(thick: f64) -> f64 {
    (thick * 3.0).max(15.0)
}

/// Calculates the two arrowhead endpoints for an arrow pointing at `end`.
///
/// Each head segment leaves the tip at ±30° from the reversed shaft direction.
/// A zero-length arrow uses a shaft angle of 0 so the head is still drawn.
pub fn arrowhead_points(start: Point, end: Point, thick: f64) -> [Point; 2] {
    let shaft = (end.y - start.y).atan2(end.x - start.x);
    let length = arrowhead_length(thick);
    let spread = ARROWHEAD_ANGLE_DEGREES.to_radians();

    let head = |angle: f64| {
        Point::new(
            end.x - length * angle.cos(),
            end.y - length * angle.sin(),
        )
    };

    [head(shaft - spread), head(shaft + spread)]
}

/// Calculates ellipse parameters from two drag corners.
///
/// Returns `(center, rx, ry)`; radii are half the absolute deltas so a
/// non-square drag yields a true ellipse.
pub fn ellipse_params(start: Point, end: Point) -> (Point, f64, f64) {
    let center = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let rx = (end.x - start.x).abs() / 2.0;
    let ry = (end.y - start.y).abs() / 2.0;
    (center, rx, ry)
}

/// Corner radius for rounded rectangles: 15% of the shorter side.
pub fn rounded_rect_radius(w: f64, h: f64) -> f64 {
    w.abs().min(h.abs()) * 0.15
}

/// Ratio between the inner and outer radius of the star tool.
pub const STAR_INNER_RATIO: f64 = 0.4;

/// Calculates the ten vertices of a five-point star inscribed from a drag box.
///
/// The center is the midpoint of the drag box, the outer radius is half the
/// box diagonal, and vertices alternate outer/inner every 36° starting at the
/// top (-90°).
pub fn star_vertices(start: Point, end: Point) -> [Point; 10] {
    let center = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let outer = (end.x - start.x).hypot(end.y - start.y) / 2.0;
    let inner = outer * STAR_INNER_RATIO;

    let mut vertices = [Point::default(); 10];
    for (i, vertex) in vertices.iter_mut().enumerate() {
        let angle = -PI / 2.0 + i as f64 * PI / 5.0;
        let radius = if i % 2 == 0 { outer } else { inner };
        *vertex = Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        );
    }
    vertices
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Shortest distance from `p` to a polyline; a single point counts as a dot.
pub fn distance_to_polyline(p: Point, points: &[Point]) -> Option<f64> {
    match points {
        [] => None,
        [only] => Some(p.distance(*only)),
        _ => points
            .windows(2)
            .map(|pair| distance_to_segment(p, pair[0], pair[1]))
            .reduce(f64::min),
    }
}

/// Shortest distance between segments `a`-`b` and `c`-`d`; zero when they cross.
pub fn distance_between_segments(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let side = |p: Point, q: Point, r: Point| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    let (d1, d2) = (side(c, d, a), side(c, d, b));
    let (d3, d4) = (side(a, b, c), side(a, b, d));
    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return 0.0;
    }
    distance_to_segment(a, c, d)
        .min(distance_to_segment(b, c, d))
        .min(distance_to_segment(c, a, b))
        .min(distance_to_segment(d, a, b))
}

/// Segments of a polyline; a single point yields one zero-length segment.
fn polyline_segments(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let dot = match points {
        [only] => Some((*only, *only)),
        _ => None,
    };
    dot.into_iter()
        .chain(points.windows(2).map(|pair| (pair[0], pair[1])))
}

/// Shortest distance between two polylines, or `None` if either is empty.
pub fn distance_between_polylines(a: &[Point], b: &[Point]) -> Option<f64> {
    polyline_segments(a)
        .flat_map(move |(p, q)| {
            polyline_segments(b).map(move |(r, s)| distance_between_segments(p, q, r, s))
        })
        .reduce(f64::min)
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps keyboard characters to colors for quick color switching.
///
/// # Supported Keys (case-insensitive)
/// - `R` → Red, `G` → Green, `B` → Blue, `Y` → Yellow
/// - `O` → Orange, `P` → Pink, `W` → White, `K` → Black
pub fn key_to_color(c: char) -> Option<Color> {
    match c.to_ascii_uppercase() {
        'R' => Some(RED),
        'G' => Some(GREEN),
        'B' => Some(BLUE),
        'Y' => Some(YELLOW),
        'O' => Some(ORANGE),
        'P' => Some(PINK),
        'W' => Some(WHITE),
        'K' => Some(BLACK), // K for blacK
        _ => None,
    }
}

/// Maps color name strings to Color values (case-insensitive).
///
/// Used by the configuration system and event scripts to parse color names.
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Maps a Color value to its human-readable name, or "Custom".
pub fn color_to_name(color: &Color) -> &'static str {
    if color.r > 0.9 && color.g < 0.1 && color.b < 0.1 {
        "Red"
    } else if color.r < 0.1 && color.g > 0.9 && color.b < 0.1 {
        "Green"
    } else if color.r < 0.1 && color.g < 0.1 && color.b > 0.9 {
        "Blue"
    } else if color.r > 0.9 && color.g > 0.9 && color.b < 0.1 {
        "Yellow"
    } else if color.r > 0.9 && (0.4..=0.6).contains(&color.g) && color.b < 0.1 {
        "Orange"
    } else if color.r > 0.9 && color.g < 0.1 && color.b > 0.9 {
        "Pink"
    } else if color.r > 0.9 && color.g > 0.9 && color.b > 0.9 {
        "White"
    } else if color.r < 0.1 && color.g < 0.1 && color.b < 0.1 {
        "Black"
    } else {
        "Custom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn crossing_segments_have_zero_distance() {
        let d = distance_between_segments(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert_eq!(d, 0.0);

        let parallel = distance_between_segments(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(10.0, 4.0),
        );
        assert!(approx(parallel, 4.0));
    }

    #[test]
    fn polyline_distance_handles_single_points() {
        let line = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let dot = [Point::new(5.0, 3.0)];
        assert_eq!(distance_between_polylines(&line, &dot), Some(3.0));
        assert_eq!(distance_between_polylines(&line, &[]), None);
    }

    #[test]
    fn intersects_ignores_touching_edges() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Bounds::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Bounds::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn arrowhead_is_fifteen_pixels_at_thirty_degrees() {
        let [left, right] = arrowhead_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 5.0);
        assert_eq!(arrowhead_length(5.0), 15.0);

        let expected_dx = 15.0 * (30f64).to_radians().cos();
        let expected_dy = 15.0 * (30f64).to_radians().sin();
        assert!(approx(left.x, 100.0 - expected_dx));
        assert!(approx(right.x, 100.0 - expected_dx));
        assert!(approx(left.y, expected_dy));
        assert!(approx(right.y, -expected_dy));
        assert!(approx(left.distance(Point::new(100.0, 0.0)), 15.0));
    }

    #[test]
    fn arrowhead_grows_with_thick_strokes() {
        assert_eq!(arrowhead_length(2.0), 15.0);
        assert_eq!(arrowhead_length(10.0), 30.0);
    }

    #[test]
    fn star_from_square_drag_box() {
        let vertices = star_vertices(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let center = Point::new(50.0, 50.0);
        let outer = 50.0 * 2f64.sqrt();

        assert_eq!(vertices.len(), 10);
        assert!(approx(vertices[0].distance(center), outer));
        assert!(approx(vertices[1].distance(center), outer * 0.4));
        assert!((outer - 70.7).abs() < 0.05);
        assert!((outer * 0.4 - 28.3).abs() < 0.05);
        // First vertex points straight up.
        assert!(approx(vertices[0].x, 50.0));
        assert!(vertices[0].y < 50.0);
    }

    #[test]
    fn ellipse_params_use_half_deltas() {
        let (center, rx, ry) = ellipse_params(Point::new(10.0, 40.0), Point::new(0.0, 0.0));
        assert_eq!(center, Point::new(5.0, 20.0));
        assert_eq!((rx, ry), (5.0, 20.0));
    }

    #[test]
    fn rounded_rect_radius_uses_shorter_side() {
        assert!(approx(rounded_rect_radius(-200.0, 40.0), 6.0));
    }

    #[test]
    fn bounds_union_and_padding() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, 5.0, 5.0, 20.0);
        assert_eq!(a.union(&b), Bounds::new(0.0, 0.0, 25.0, 25.0));
        assert!(a.inflated(10.0).contains(Point::new(-10.0, 20.0)));
        assert!(!a.contains(Point::new(-0.5, 5.0)));
        assert!(Bounds::default().is_degenerate());
    }

    #[test]
    fn polyline_distance_handles_single_point() {
        let d = distance_to_polyline(Point::new(3.0, 4.0), &[Point::new(0.0, 0.0)]).unwrap();
        assert!(approx(d, 5.0));
        assert!(distance_to_polyline(Point::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn key_and_name_color_mappings() {
        assert_eq!(key_to_color('r').unwrap(), RED);
        assert_eq!(key_to_color('K').unwrap(), BLACK);
        assert!(key_to_color('x').is_none());
        assert_eq!(name_to_color("white").unwrap(), WHITE);
        assert!(name_to_color("chartreuse").is_none());
        assert_eq!(color_to_name(&RED), "Red");
        assert_eq!(color_to_name(&Color::new(0.42, 0.42, 0.42, 1.0)), "Custom");
    }
}
