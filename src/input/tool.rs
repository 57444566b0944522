//! Drawing tool selection and the per-gesture tool snapshot.

use crate::draw::{Color, ShapeKind};
use serde::{Deserialize, Serialize};

/// Drawing tool selection.
///
/// The active tool determines what a pointer gesture does. Shape tools map
/// one-to-one onto [`ShapeKind`]; cursor overlays (magnifier, highlighter,
/// laser) never modify the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Pick objects or lift rectangular regions
    Select,
    /// Freehand drawing (default)
    #[default]
    Brush,
    /// Paints the background along the pointer path
    Eraser,
    /// Click to place multi-line text
    Text,
    /// Zoom lens following the pointer
    Magnifier,
    /// Spotlight circle following the pointer
    Highlighter,
    /// Glowing dot following the pointer
    LaserPointer,
    Line,
    Arrow,
    Rectangle,
    Ellipse,
    RoundedRectangle,
    Star,
}

impl Tool {
    /// Returns the shape drawn by this tool, if it is a shape tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Line => Some(ShapeKind::Line),
            Tool::Arrow => Some(ShapeKind::Arrow),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Ellipse => Some(ShapeKind::Ellipse),
            Tool::RoundedRectangle => Some(ShapeKind::RoundedRectangle),
            Tool::Star => Some(ShapeKind::Star),
            _ => None,
        }
    }

    /// True for tools that only draw a cursor overlay.
    pub fn is_overlay(self) -> bool {
        matches!(self, Tool::Magnifier | Tool::Highlighter | Tool::LaserPointer)
    }

    /// Human-readable name for logs and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Text => "Text",
            Tool::Magnifier => "Magnifier",
            Tool::Highlighter => "Highlighter",
            Tool::LaserPointer => "Laser pointer",
            Tool::Line => "Line",
            Tool::Arrow => "Arrow",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::RoundedRectangle => "Rounded rectangle",
            Tool::Star => "Star",
        }
    }
}

/// Immutable copy of the drawing parameters, captured when a gesture starts.
///
/// Changing the color or size mid-gesture only affects the next gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    pub color: Color,
    /// Stroke width in pixels
    pub thick: f64,
    /// Text size in pixels
    pub font_size: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shape_tools_have_a_kind() {
        assert_eq!(Tool::Star.shape_kind(), Some(ShapeKind::Star));
        assert_eq!(Tool::Brush.shape_kind(), None);
        assert!(Tool::Magnifier.is_overlay());
        assert!(!Tool::Text.is_overlay());
    }

    #[test]
    fn tool_names_deserialize_kebab_case() {
        let tool: Tool = serde_json::from_str("\"rounded-rectangle\"").unwrap();
        assert_eq!(tool, Tool::RoundedRectangle);
        let tool: Tool = serde_json::from_str("\"laser-pointer\"").unwrap();
        assert_eq!(tool, Tool::LaserPointer);
    }
}
