//! Cursor-following overlays for the magnifier, highlighter and laser tools.
//!
//! These draw onto a separate context (the host's frame buffer, composited
//! above the canvas). They read the canvas surface and the current tool
//! parameters but never modify the document, history, or selection.

use crate::config::OverlayConfig;
use crate::draw::Color;
use crate::input::Tool;
use crate::util::{Bounds, Point};
use std::f64::consts::PI;

/// Dimming applied outside the highlighter spotlight.
const HIGHLIGHTER_DIM: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.45,
};

/// Runtime overlay parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySettings {
    pub highlighter_radius: f64,
    pub laser_radius: f64,
    pub magnifier_radius: f64,
    pub magnifier_zoom: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::from(&OverlayConfig::default())
    }
}

impl From<&OverlayConfig> for OverlaySettings {
    fn from(cfg: &OverlayConfig) -> Self {
        Self {
            highlighter_radius: cfg.highlighter_radius,
            laser_radius: cfg.laser_radius,
            magnifier_radius: cfg.magnifier_radius,
            magnifier_zoom: cfg.magnifier_zoom,
        }
    }
}

/// Draws the overlay for `tool` at `cursor`, if the tool has one.
///
/// `viewport` is the area covered by `ctx`; `source` is the canvas surface the
/// magnifier samples from.
pub fn render_cursor_overlay(
    ctx: &cairo::Context,
    tool: Tool,
    color: Color,
    cursor: Point,
    viewport: Bounds,
    source: &cairo::ImageSurface,
    settings: &OverlaySettings,
) {
    match tool {
        Tool::Highlighter => {
            render_highlighter(ctx, cursor, viewport, color, settings.highlighter_radius)
        }
        Tool::LaserPointer => render_laser(ctx, cursor, color, settings.laser_radius),
        Tool::Magnifier => render_magnifier(
            ctx,
            cursor,
            source,
            settings.magnifier_radius,
            settings.magnifier_zoom,
        ),
        _ => {}
    }
}

/// Dims the viewport except for a disc around the cursor, ringed in the pen color.
pub fn render_highlighter(
    ctx: &cairo::Context,
    cursor: Point,
    viewport: Bounds,
    color: Color,
    radius: f64,
) {
    ctx.save().ok();
    ctx.new_path();
    ctx.set_fill_rule(cairo::FillRule::EvenOdd);
    ctx.rectangle(viewport.x, viewport.y, viewport.w, viewport.h);
    ctx.arc(cursor.x, cursor.y, radius, 0.0, 2.0 * PI);
    HIGHLIGHTER_DIM.apply(ctx);
    let _ = ctx.fill();

    color.with_alpha(0.8).apply(ctx);
    ctx.set_line_width(3.0);
    ctx.arc(cursor.x, cursor.y, radius, 0.0, 2.0 * PI);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

/// Glowing dot: a radial fade in the pen color around a bright core.
pub fn render_laser(ctx: &cairo::Context, cursor: Point, color: Color, radius: f64) {
    let glow = radius * 2.5;
    let gradient = cairo::RadialGradient::new(cursor.x, cursor.y, 0.0, cursor.x, cursor.y, glow);
    gradient.add_color_stop_rgba(0.0, color.r, color.g, color.b, 0.9);
    gradient.add_color_stop_rgba(0.4, color.r, color.g, color.b, 0.5);
    gradient.add_color_stop_rgba(1.0, color.r, color.g, color.b, 0.0);

    ctx.save().ok();
    if ctx.set_source(&gradient).is_ok() {
        ctx.arc(cursor.x, cursor.y, glow, 0.0, 2.0 * PI);
        let _ = ctx.fill();
    }

    ctx.set_source_rgba(1.0, 1.0, 1.0, 0.95);
    ctx.arc(cursor.x, cursor.y, radius * 0.4, 0.0, 2.0 * PI);
    let _ = ctx.fill();
    ctx.restore().ok();
}

/// Circular lens showing the canvas around the cursor enlarged by `zoom`.
pub fn render_magnifier(
    ctx: &cairo::Context,
    cursor: Point,
    source: &cairo::ImageSurface,
    radius: f64,
    zoom: f64,
) {
    ctx.save().ok();
    ctx.new_path();
    ctx.arc(cursor.x, cursor.y, radius, 0.0, 2.0 * PI);
    ctx.clip();

    // Keep the point under the cursor fixed while scaling around it.
    ctx.translate(cursor.x, cursor.y);
    ctx.scale(zoom, zoom);
    ctx.translate(-cursor.x, -cursor.y);
    if ctx.set_source_surface(source, 0.0, 0.0).is_ok() {
        let _ = ctx.paint();
    }
    ctx.restore().ok();

    ctx.save().ok();
    ctx.set_source_rgba(0.2, 0.2, 0.2, 0.9);
    ctx.set_line_width(2.0);
    ctx.arc(cursor.x, cursor.y, radius, 0.0, 2.0 * PI);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;
    use crate::draw::{Background, Canvas};

    fn pixel(surface: &mut cairo::ImageSurface, x: i32, y: i32) -> [u8; 4] {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y as usize * stride + x as usize * 4;
        [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]
    }

    #[test]
    fn highlighter_dims_outside_the_spotlight_only() {
        let mut target = cairo::ImageSurface::create(cairo::Format::ARgb32, 200, 200).unwrap();
        {
            let ctx = cairo::Context::new(&target).unwrap();
            render_highlighter(
                &ctx,
                Point::new(100.0, 100.0),
                Bounds::new(0.0, 0.0, 200.0, 200.0),
                RED,
                40.0,
            );
        }
        target.flush();
        assert_eq!(pixel(&mut target, 100, 100)[3], 0);
        assert!(pixel(&mut target, 5, 5)[3] > 0);
    }

    #[test]
    fn overlays_leave_the_canvas_untouched() {
        let mut canvas = Canvas::new(100, 100, Background::Whiteboard).unwrap();
        let before = canvas.snapshot().unwrap();

        let target = cairo::ImageSurface::create(cairo::Format::ARgb32, 100, 100).unwrap();
        {
            let ctx = cairo::Context::new(&target).unwrap();
            for tool in [Tool::Magnifier, Tool::Highlighter, Tool::LaserPointer] {
                render_cursor_overlay(
                    &ctx,
                    tool,
                    RED,
                    Point::new(50.0, 50.0),
                    canvas.bounds(),
                    canvas.surface(),
                    &OverlaySettings::default(),
                );
            }
        }

        assert_eq!(canvas.snapshot().unwrap(), before);
    }

    #[test]
    fn non_overlay_tools_draw_nothing() {
        let canvas = Canvas::new(50, 50, Background::Transparent).unwrap();
        let mut target = cairo::ImageSurface::create(cairo::Format::ARgb32, 50, 50).unwrap();
        {
            let ctx = cairo::Context::new(&target).unwrap();
            render_cursor_overlay(
                &ctx,
                Tool::Brush,
                RED,
                Point::new(25.0, 25.0),
                canvas.bounds(),
                canvas.surface(),
                &OverlaySettings::default(),
            );
        }
        target.flush();
        assert!(target.data().unwrap().iter().all(|b| *b == 0));
    }
}
