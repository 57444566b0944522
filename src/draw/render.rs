//! Cairo-based rendering functions for drawable objects.
//!
//! Each shape primitive is a pure function of its arguments: drawing the same
//! inputs onto the same baseline always yields the same pixels, which the
//! restore-then-redraw preview loop depends on.

use super::canvas::{Background, PixelBuffer};
use super::color::Color;
use super::font::FontDescriptor;
use super::object::{DrawableObject, ShapeKind, TEXT_LINE_HEIGHT, text_lines};
use crate::util::{self, Bounds, Point};
use std::f64::consts::PI;

/// Color of the marquee / selection outline.
const SELECTION_OUTLINE: Color = Color {
    r: 0.2,
    g: 0.55,
    b: 1.0,
    a: 1.0,
};

/// Fills the whole surface with the background (or clears it when transparent).
pub fn fill_background(ctx: &cairo::Context, background: Background) {
    ctx.save().ok();
    apply_background_operator(ctx, background);
    let _ = ctx.paint();
    ctx.restore().ok();
}

/// Fills a rectangle with the background, replacing whatever was there.
pub fn fill_region(ctx: &cairo::Context, region: Bounds, background: Background) {
    ctx.save().ok();
    apply_background_operator(ctx, background);
    ctx.rectangle(region.x, region.y, region.w, region.h);
    let _ = ctx.fill();
    ctx.restore().ok();
}

fn apply_background_operator(ctx: &cairo::Context, background: Background) {
    match background.color() {
        Some(color) => {
            ctx.set_operator(cairo::Operator::Source);
            color.apply(ctx);
        }
        None => ctx.set_operator(cairo::Operator::Clear),
    }
}

/// Renders all objects in order (first = bottom layer).
pub fn render_objects(ctx: &cairo::Context, objects: &[DrawableObject], background: Background) {
    for object in objects {
        render_object(ctx, object, background);
    }
}

/// Renders a single object, dispatching on its variant.
pub fn render_object(ctx: &cairo::Context, object: &DrawableObject, background: Background) {
    match object {
        DrawableObject::Stroke {
            points,
            color,
            thick,
            ..
        } => render_stroke(ctx, points, *color, *thick),
        DrawableObject::Shape {
            kind,
            start,
            end,
            color,
            thick,
            ..
        } => render_shape(ctx, *kind, *start, *end, *color, *thick),
        DrawableObject::Text {
            origin,
            text,
            color,
            size,
            font,
            ..
        } => render_text(ctx, *origin, text, *color, *size, font),
        DrawableObject::Erase { points, thick, .. } => {
            render_erase(ctx, points, *thick, background)
        }
        DrawableObject::Patch {
            source,
            dest,
            pixels,
            ..
        } => render_patch(ctx, *source, *dest, pixels, background),
    }
}

/// Renders a freehand polyline with round caps and joins.
///
/// A single-point stroke renders as a filled dot whose diameter equals the
/// thickness, so a click without movement still leaves ink.
pub fn render_stroke(ctx: &cairo::Context, points: &[Point], color: Color, thick: f64) {
    match points {
        [] => {}
        [only] => render_dot(ctx, *only, color, thick),
        [first, rest @ ..] => {
            ctx.save().ok();
            color.apply(ctx);
            ctx.set_line_width(thick);
            ctx.set_line_cap(cairo::LineCap::Round);
            ctx.set_line_join(cairo::LineJoin::Round);
            ctx.move_to(first.x, first.y);
            for point in rest {
                ctx.line_to(point.x, point.y);
            }
            let _ = ctx.stroke();
            ctx.restore().ok();
        }
    }
}

/// Fills a dot of diameter `thick` centered on `center`.
pub fn render_dot(ctx: &cairo::Context, center: Point, color: Color, thick: f64) {
    ctx.save().ok();
    color.apply(ctx);
    ctx.new_path();
    ctx.arc(center.x, center.y, thick / 2.0, 0.0, 2.0 * PI);
    let _ = ctx.fill();
    ctx.restore().ok();
}

/// Renders one round-capped segment; used to extend a live brush stroke.
pub fn render_segment(ctx: &cairo::Context, from: Point, to: Point, color: Color, thick: f64) {
    ctx.save().ok();
    color.apply(ctx);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

/// Renders a geometric shape between two drag points.
pub fn render_shape(
    ctx: &cairo::Context,
    kind: ShapeKind,
    start: Point,
    end: Point,
    color: Color,
    thick: f64,
) {
    ctx.save().ok();
    color.apply(ctx);
    ctx.set_line_width(thick);
    ctx.new_path();

    match kind {
        ShapeKind::Line => render_line(ctx, start, end),
        ShapeKind::Arrow => render_arrow(ctx, start, end, thick),
        ShapeKind::Rectangle => render_rect(ctx, Bounds::from_corners(start, end)),
        ShapeKind::Ellipse => render_ellipse(ctx, start, end),
        ShapeKind::RoundedRectangle => render_rounded_rect(ctx, Bounds::from_corners(start, end)),
        ShapeKind::Star => render_star(ctx, start, end),
    }

    ctx.restore().ok();
}

fn render_line(ctx: &cairo::Context, start: Point, end: Point) {
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    let _ = ctx.stroke();
}

/// Shaft plus two head segments leaving the tip at ±30°.
fn render_arrow(ctx: &cairo::Context, start: Point, end: Point, thick: f64) {
    let [left, right] = util::arrowhead_points(start, end, thick);

    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    ctx.move_to(end.x, end.y);
    ctx.line_to(left.x, left.y);
    ctx.move_to(end.x, end.y);
    ctx.line_to(right.x, right.y);
    let _ = ctx.stroke();
}

fn render_rect(ctx: &cairo::Context, rect: Bounds) {
    ctx.set_line_join(cairo::LineJoin::Miter);
    ctx.rectangle(rect.x, rect.y, rect.w, rect.h);
    let _ = ctx.stroke();
}

/// Ellipse inscribed in the drag box, built by scaling a unit circle.
fn render_ellipse(ctx: &cairo::Context, start: Point, end: Point) {
    let (center, rx, ry) = util::ellipse_params(start, end);
    if rx == 0.0 || ry == 0.0 {
        // A zero radius would make the scale matrix singular.
        return;
    }

    ctx.save().ok();
    ctx.translate(center.x, center.y);
    ctx.scale(rx, ry);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    ctx.restore().ok();

    let _ = ctx.stroke();
}

/// Four straight edges joined by quarter arcs of radius `min(w, h) * 0.15`.
fn render_rounded_rect(ctx: &cairo::Context, rect: Bounds) {
    let r = util::rounded_rect_radius(rect.w, rect.h);
    if r <= 0.0 {
        render_rect(ctx, rect);
        return;
    }

    let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    ctx.line_to(x + w, y + h - r);
    ctx.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    ctx.line_to(x + r, y + h);
    ctx.arc(x + r, y + h - r, r, PI / 2.0, PI);
    ctx.line_to(x, y + r);
    ctx.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    ctx.close_path();
    let _ = ctx.stroke();
}

fn render_star(ctx: &cairo::Context, start: Point, end: Point) {
    let vertices = util::star_vertices(start, end);
    // Round joins keep the sharp tips inside the padded bounding box.
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.move_to(vertices[0].x, vertices[0].y);
    for vertex in &vertices[1..] {
        ctx.line_to(vertex.x, vertex.y);
    }
    ctx.close_path();
    let _ = ctx.stroke();
}

/// Renders multi-line text with Pango, one layout per line.
///
/// `origin` is the top-left of the first line; line `i` is placed at
/// `origin.y + i * size * 1.2`.
pub fn render_text(
    ctx: &cairo::Context,
    origin: Point,
    text: &str,
    color: Color,
    size: f64,
    font: &FontDescriptor,
) {
    ctx.save().ok();
    // Gray antialiasing avoids color fringes on a transparent overlay.
    ctx.set_antialias(cairo::Antialias::Gray);
    color.apply(ctx);

    let layout = pangocairo::functions::create_layout(ctx);
    layout.set_font_description(Some(&font.to_font_description(size)));

    for (index, line) in text_lines(text).enumerate() {
        if line.is_empty() {
            continue;
        }
        layout.set_text(line);
        ctx.move_to(origin.x, origin.y + index as f64 * size * TEXT_LINE_HEIGHT);
        pangocairo::functions::show_layout(ctx, &layout);
    }

    ctx.restore().ok();
}

/// Renders an eraser path by painting the background along it.
pub fn render_erase(ctx: &cairo::Context, points: &[Point], thick: f64, background: Background) {
    if points.is_empty() {
        return;
    }

    ctx.save().ok();
    apply_background_operator(ctx, background);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.new_path();
    if let [only] = points {
        ctx.arc(only.x, only.y, thick / 2.0, 0.0, 2.0 * PI);
        let _ = ctx.fill();
    } else {
        ctx.move_to(points[0].x, points[0].y);
        for point in &points[1..] {
            ctx.line_to(point.x, point.y);
        }
        let _ = ctx.stroke();
    }
    ctx.restore().ok();
}

/// Blits lifted pixels at `dest` without touching the source area.
pub fn render_pixels(ctx: &cairo::Context, dest: Point, pixels: &PixelBuffer) {
    let surface = match pixels.to_surface() {
        Ok(surface) => surface,
        Err(err) => {
            log::warn!("Skipping region blit: {err}");
            return;
        }
    };

    ctx.save().ok();
    ctx.set_operator(cairo::Operator::Source);
    if ctx.set_source_surface(&surface, dest.x, dest.y).is_ok() {
        ctx.rectangle(dest.x, dest.y, pixels.width as f64, pixels.height as f64);
        let _ = ctx.fill();
    }
    ctx.restore().ok();
}

/// Renders a moved marquee region: clear the source, then place the pixels.
pub fn render_patch(
    ctx: &cairo::Context,
    source: Bounds,
    dest: Point,
    pixels: &PixelBuffer,
    background: Background,
) {
    fill_region(ctx, source, background);
    render_pixels(ctx, dest, pixels);
}

/// Dashed outline used for the live marquee and a lifted region.
pub fn render_selection_outline(ctx: &cairo::Context, rect: Bounds) {
    ctx.save().ok();
    SELECTION_OUTLINE.apply(ctx);
    ctx.set_line_width(1.0);
    ctx.set_dash(&[6.0, 4.0], 0.0);
    ctx.rectangle(rect.x + 0.5, rect.y + 0.5, rect.w - 1.0, rect.h - 1.0);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

/// Draws the insertion caret after the last character of the text being edited.
pub fn render_text_caret(
    ctx: &cairo::Context,
    origin: Point,
    text: &str,
    color: Color,
    size: f64,
    font: &FontDescriptor,
) {
    let last_index = text_lines(text).count().saturating_sub(1);
    let last_line = text_lines(text).last().unwrap_or("");

    ctx.save().ok();
    let layout = pangocairo::functions::create_layout(ctx);
    layout.set_font_description(Some(&font.to_font_description(size)));
    layout.set_text(last_line);
    let (width, _) = layout.pixel_size();

    let x = origin.x + width as f64 + 1.0;
    let y = origin.y + last_index as f64 * size * TEXT_LINE_HEIGHT;
    color.apply(ctx);
    ctx.set_line_width(2.0);
    ctx.move_to(x, y);
    ctx.line_to(x, y + size);
    let _ = ctx.stroke();
    ctx.restore().ok();
}
