//! Rendering primitives and the annotation object model (Cairo-based).
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`DrawableObject`]: committed marks (strokes, shapes, text, erase, moved regions)
//! - [`Document`]: ordered log of all committed objects
//! - [`Canvas`]: the raster surface the document is rendered onto
//! - Rendering functions for Cairo-based output

pub mod canvas;
pub mod color;
pub mod document;
pub mod font;
pub mod object;
pub mod render;

pub use canvas::{Background, Canvas, PixelBuffer, SurfaceError};
pub use color::Color;
pub use document::{Document, HIT_TOLERANCE};
pub use font::FontDescriptor;
pub use object::{DrawableObject, ShapeKind};
pub use render::{render_object, render_objects, render_shape, render_text};
