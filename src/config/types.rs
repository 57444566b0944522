//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::draw::Background;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the initial tool parameters when the canvas first opens.
/// Users can change these values at runtime using keybindings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - either a named color (red, green, blue, yellow, orange, pink, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 2.0 - 20.0)
    #[serde(default = "default_thickness")]
    pub default_thickness: f64,

    /// Default text size in pixels (valid range: 16.0 - 64.0)
    #[serde(default = "default_font_size")]
    pub default_font_size: f64,

    /// Font family name for text rendering (e.g., "Sans", "Monospace", "JetBrains Mono")
    /// Pango substitutes a fallback if the family is not installed
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_thickness: default_thickness(),
            default_font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
        }
    }
}

/// Cursor overlay appearance.
///
/// The magnifier, highlighter and laser tools only draw at the pointer and
/// never modify the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverlayConfig {
    /// Radius of the highlighter spotlight in pixels (valid range: 10.0 - 200.0)
    #[serde(default = "default_highlighter_radius")]
    pub highlighter_radius: f64,

    /// Radius of the laser dot in pixels (valid range: 2.0 - 50.0)
    #[serde(default = "default_laser_radius")]
    pub laser_radius: f64,

    /// Radius of the magnifier lens in pixels (valid range: 20.0 - 300.0)
    #[serde(default = "default_magnifier_radius")]
    pub magnifier_radius: f64,

    /// Magnification factor (valid range: 1.5 - 8.0)
    #[serde(default = "default_magnifier_zoom")]
    pub magnifier_zoom: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            highlighter_radius: default_highlighter_radius(),
            laser_radius: default_laser_radius(),
            magnifier_radius: default_magnifier_radius(),
            magnifier_zoom: default_magnifier_zoom(),
        }
    }
}

/// Canvas settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Background fill: transparent, whiteboard, or blackboard
    #[serde(default)]
    pub background: Background,

    /// Number of undoable steps kept (valid range: 1 - 500)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: Background::default(),
            history_limit: default_history_limit(),
        }
    }
}

/// PNG export settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for exported images; `~` expands to the home directory
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// Filename template using chrono format specifiers (e.g. "%Y-%m-%d_%H%M%S")
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_thickness() -> f64 {
    4.0
}

fn default_font_size() -> f64 {
    24.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_highlighter_radius() -> f64 {
    60.0
}

fn default_laser_radius() -> f64 {
    8.0
}

fn default_magnifier_radius() -> f64 {
    90.0
}

fn default_magnifier_zoom() -> f64 {
    2.0
}

fn default_history_limit() -> usize {
    crate::history::DEFAULT_HISTORY_LIMIT
}

fn default_save_directory() -> String {
    "~/Pictures/Overmark".to_string()
}

fn default_filename_template() -> String {
    "overmark_%Y-%m-%d_%H%M%S".to_string()
}
