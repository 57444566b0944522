//! Raster surface management.
//!
//! The [`Canvas`] owns the ARGB32 image surface the user sees. Every committed
//! state is reproducible by [`Canvas::render_document`]; live previews use
//! [`Canvas::snapshot`] / [`Canvas::restore`] to repaint a saved baseline before
//! drawing the in-progress gesture.

use super::color::{BLACKBOARD, Color, WHITEBOARD};
use super::document::Document;
use super::render;
use crate::util::Bounds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while manipulating the raster surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data is still borrowed: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] cairo::IoError),

    #[error("Pixel buffer is {buffer_w}x{buffer_h} but surface is {surface_w}x{surface_h}")]
    SizeMismatch {
        buffer_w: i32,
        buffer_h: i32,
        surface_w: i32,
        surface_h: i32,
    },

    #[error("Invalid surface size {0}x{1}")]
    InvalidSize(i32, i32),
}

/// Canvas background fill.
///
/// Used when clearing the surface, under eraser strokes, and behind lifted
/// marquee regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Background {
    /// Transparent overlay showing the underlying screen (default)
    #[default]
    Transparent,
    /// Light background
    Whiteboard,
    /// Dark background
    Blackboard,
}

impl Background {
    /// Returns the fill color, or `None` for a transparent canvas.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Transparent => None,
            Self::Whiteboard => Some(WHITEBOARD),
            Self::Blackboard => Some(BLACKBOARD),
        }
    }
}

/// Raw premultiplied ARGB32 pixels copied off a surface.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Wraps a copy of the pixels in a standalone image surface.
    pub fn to_surface(&self) -> Result<cairo::ImageSurface, SurfaceError> {
        Ok(cairo::ImageSurface::create_for_data(
            self.data.clone(),
            cairo::Format::ARgb32,
            self.width,
            self.height,
            self.stride,
        )?)
    }

    /// True if any byte is non-zero (i.e. some pixel is not fully transparent black).
    pub fn has_ink(&self) -> bool {
        self.data.iter().any(|byte| *byte != 0)
    }
}

/// The annotation raster surface.
pub struct Canvas {
    surface: cairo::ImageSurface,
    background: Background,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("background", &self.background)
            .finish()
    }
}

impl Canvas {
    /// Creates a cleared canvas of the given size.
    pub fn new(width: i32, height: i32, background: Background) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidSize(width, height));
        }
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        let mut canvas = Self {
            surface,
            background,
        };
        canvas.clear()?;
        Ok(canvas)
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    /// Full-surface bounds.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width() as f64, self.height() as f64)
    }

    /// Borrow the underlying surface (e.g. as a source for overlays).
    pub fn surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    /// Runs `f` with a fresh Cairo context on the surface.
    ///
    /// The context is dropped before returning so pixel access stays possible.
    pub fn draw<T>(&mut self, f: impl FnOnce(&cairo::Context) -> T) -> Result<T, SurfaceError> {
        let ctx = cairo::Context::new(&self.surface)?;
        let result = f(&ctx);
        drop(ctx);
        self.surface.flush();
        Ok(result)
    }

    /// Fills the whole surface with the background.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let background = self.background;
        self.draw(|ctx| render::fill_background(ctx, background))
    }

    /// Clears the surface and replays every object in the document.
    pub fn render_document(&mut self, document: &Document) -> Result<(), SurfaceError> {
        let background = self.background;
        self.draw(|ctx| {
            render::fill_background(ctx, background);
            render::render_objects(ctx, document.objects(), background);
        })
    }

    /// Copies the full surface into a pixel buffer.
    pub fn snapshot(&mut self) -> Result<PixelBuffer, SurfaceError> {
        let width = self.width();
        let height = self.height();
        let stride = self.surface.stride();
        self.surface.flush();
        let data = self.surface.data()?;
        Ok(PixelBuffer {
            width,
            height,
            stride,
            data: data.to_vec(),
        })
    }

    /// Overwrites the full surface with a previously taken snapshot.
    pub fn restore(&mut self, buffer: &PixelBuffer) -> Result<(), SurfaceError> {
        if buffer.width != self.width()
            || buffer.height != self.height()
            || buffer.stride != self.surface.stride()
        {
            return Err(SurfaceError::SizeMismatch {
                buffer_w: buffer.width,
                buffer_h: buffer.height,
                surface_w: self.width(),
                surface_h: self.height(),
            });
        }
        let mut data = self.surface.data()?;
        data.copy_from_slice(&buffer.data);
        Ok(())
    }

    /// Copies the pixels inside `region` (clipped to the surface) into a new buffer.
    ///
    /// Returns the clipped integer region alongside the pixels, or `None` when the
    /// region misses the surface entirely.
    pub fn copy_region(&mut self, region: Bounds) -> Result<Option<(Bounds, PixelBuffer)>, SurfaceError> {
        let x0 = (region.x.floor() as i32).clamp(0, self.width());
        let y0 = (region.y.floor() as i32).clamp(0, self.height());
        let x1 = (region.right().ceil() as i32).clamp(0, self.width());
        let y1 = (region.bottom().ceil() as i32).clamp(0, self.height());
        let (w, h) = (x1 - x0, y1 - y0);
        if w <= 0 || h <= 0 {
            return Ok(None);
        }

        let src_stride = self.surface.stride() as usize;
        let dst_stride = cairo::Format::ARgb32.stride_for_width(w as u32)?;
        let mut out = vec![0u8; dst_stride as usize * h as usize];

        self.surface.flush();
        let data = self.surface.data()?;
        let row_bytes = w as usize * 4;
        for row in 0..h as usize {
            let src_start = (y0 as usize + row) * src_stride + x0 as usize * 4;
            let dst_start = row * dst_stride as usize;
            out[dst_start..dst_start + row_bytes]
                .copy_from_slice(&data[src_start..src_start + row_bytes]);
        }

        let clipped = Bounds::new(x0 as f64, y0 as f64, w as f64, h as f64);
        let buffer = PixelBuffer {
            width: w,
            height: h,
            stride: dst_stride,
            data: out,
        };
        Ok(Some((clipped, buffer)))
    }

    /// Fills `region` with the background, as if its pixels had been lifted away.
    pub fn clear_region(&mut self, region: Bounds) -> Result<(), SurfaceError> {
        let background = self.background;
        self.draw(|ctx| render::fill_region(ctx, region, background))
    }

    /// Encodes the current surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut bytes = Vec::new();
        self.surface.write_to_png(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawableObject, color::RED};
    use crate::util::Point;

    #[test]
    fn new_transparent_canvas_is_empty() {
        let mut canvas = Canvas::new(16, 8, Background::Transparent).unwrap();
        assert!(!canvas.snapshot().unwrap().has_ink());
    }

    #[test]
    fn whiteboard_canvas_is_filled() {
        let mut canvas = Canvas::new(4, 4, Background::Whiteboard).unwrap();
        let snapshot = canvas.snapshot().unwrap();
        assert!(snapshot.data.iter().all(|byte| *byte > 200));
    }

    #[test]
    fn rejects_empty_surfaces() {
        assert!(matches!(
            Canvas::new(0, 10, Background::Transparent),
            Err(SurfaceError::InvalidSize(0, 10))
        ));
    }

    #[test]
    fn restore_returns_to_snapshot() {
        let mut canvas = Canvas::new(64, 64, Background::Transparent).unwrap();
        let baseline = canvas.snapshot().unwrap();

        let mut doc = Document::new();
        doc.push(DrawableObject::stroke(
            vec![Point::new(5.0, 5.0), Point::new(60.0, 60.0)],
            RED,
            6.0,
        ));
        canvas.render_document(&doc).unwrap();
        assert_ne!(canvas.snapshot().unwrap(), baseline);

        canvas.restore(&baseline).unwrap();
        assert_eq!(canvas.snapshot().unwrap(), baseline);
    }

    #[test]
    fn restore_rejects_mismatched_buffers() {
        let mut small = Canvas::new(8, 8, Background::Transparent).unwrap();
        let mut large = Canvas::new(16, 16, Background::Transparent).unwrap();
        let snapshot = large.snapshot().unwrap();
        assert!(matches!(
            small.restore(&snapshot),
            Err(SurfaceError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn copy_region_clips_to_surface() {
        let mut canvas = Canvas::new(20, 20, Background::Whiteboard).unwrap();
        let (clipped, pixels) = canvas
            .copy_region(Bounds::new(15.0, -5.0, 10.0, 10.0))
            .unwrap()
            .expect("region overlaps the canvas");
        assert_eq!(clipped, Bounds::new(15.0, 0.0, 5.0, 5.0));
        assert_eq!((pixels.width, pixels.height), (5, 5));
        assert!(pixels.has_ink());

        assert!(
            canvas
                .copy_region(Bounds::new(40.0, 40.0, 5.0, 5.0))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn encode_png_produces_png_signature() {
        let canvas = Canvas::new(4, 4, Background::Blackboard).unwrap();
        let bytes = canvas.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
