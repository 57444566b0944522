//! Configuration file support for overmark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/overmark/config.toml`. Settings include drawing defaults,
//! cursor overlay appearance, canvas background, export paths, and keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

pub use enums::ColorSpec;
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{CanvasConfig, DrawingConfig, ExportConfig, OverlayConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Stroke width range accepted everywhere (config and runtime adjustment).
pub const THICKNESS_RANGE: (f64, f64) = (2.0, 20.0);

/// Font size range accepted everywhere (config and runtime adjustment).
pub const FONT_SIZE_RANGE: (f64, f64) = (16.0, 64.0);

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_thickness = 4.0
/// default_font_size = 24.0
///
/// [overlay]
/// highlighter_radius = 60.0
/// laser_radius = 8.0
///
/// [canvas]
/// background = "whiteboard"
/// history_limit = 50
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Drawing tool defaults (color, thickness, font)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Cursor overlay appearance
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Canvas background and history size
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// PNG export location
    #[serde(default)]
    pub export: ExportConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

fn clamp_with_warning(name: &str, value: &mut f64, (min, max): (f64, f64)) {
    if value.is_nan() {
        log::warn!("Invalid {name} NaN, using {min:.1}");
        *value = min;
    } else if !(min..=max).contains(value) {
        log::warn!("Invalid {name} {value:.1}, clamping to {min:.1}-{max:.1} range");
        *value = value.clamp(min, max);
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_thickness`: 2.0 - 20.0
    /// - `default_font_size`: 16.0 - 64.0
    /// - `highlighter_radius`: 10.0 - 200.0
    /// - `laser_radius`: 2.0 - 50.0
    /// - `magnifier_radius`: 20.0 - 300.0
    /// - `magnifier_zoom`: 1.5 - 8.0
    /// - `history_limit`: 1 - 500
    pub fn validate_and_clamp(&mut self) {
        clamp_with_warning(
            "default_thickness",
            &mut self.drawing.default_thickness,
            THICKNESS_RANGE,
        );
        clamp_with_warning(
            "default_font_size",
            &mut self.drawing.default_font_size,
            FONT_SIZE_RANGE,
        );
        clamp_with_warning(
            "highlighter_radius",
            &mut self.overlay.highlighter_radius,
            (10.0, 200.0),
        );
        clamp_with_warning("laser_radius", &mut self.overlay.laser_radius, (2.0, 50.0));
        clamp_with_warning(
            "magnifier_radius",
            &mut self.overlay.magnifier_radius,
            (20.0, 300.0),
        );
        clamp_with_warning("magnifier_zoom", &mut self.overlay.magnifier_zoom, (1.5, 8.0));

        if !(1..=500).contains(&self.canvas.history_limit) {
            log::warn!(
                "Invalid history_limit {}, clamping to 1-500 range",
                self.canvas.history_limit
            );
            self.canvas.history_limit = self.canvas.history_limit.clamp(1, 500);
        }

        // Validate font weight is reasonable
        let valid_weight = matches!(
            self.drawing.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .drawing
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.drawing.font_weight
            );
            self.drawing.font_weight = "normal".to_string();
        }

        // Validate font style
        if !matches!(
            self.drawing.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            log::warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                self.drawing.font_style
            );
            self.drawing.font_style = "normal".to_string();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/overmark/config.toml`
    /// (or under `$XDG_CONFIG_HOME` when set).
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("overmark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined, or if the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path; a missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses TOML without validation.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Background;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.drawing.default_thickness, 4.0);
        assert_eq!(config.canvas.history_limit, 50);
        assert_eq!(config.canvas.background, Background::Transparent);
        assert_eq!(config.keybindings.undo, vec!["Ctrl+Z".to_string()]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = Config::from_toml_str(
            r#"
            [drawing]
            default_thickness = 40.0
            default_font_size = 4.0
            font_weight = "extra-chunky"

            [canvas]
            background = "blackboard"
            history_limit = 0
            "#,
        )
        .unwrap();
        config.validate_and_clamp();

        assert_eq!(config.drawing.default_thickness, 20.0);
        assert_eq!(config.drawing.default_font_size, 16.0);
        assert_eq!(config.drawing.font_weight, "normal");
        assert_eq!(config.canvas.history_limit, 1);
        assert_eq!(config.canvas.background, Background::Blackboard);
    }

    #[test]
    fn non_finite_values_are_brought_into_range() {
        let mut config = Config::from_toml_str(
            "[drawing]\ndefault_thickness = nan\ndefault_font_size = inf\n",
        )
        .unwrap();
        config.validate_and_clamp();
        assert_eq!(config.drawing.default_thickness, 2.0);
        assert_eq!(config.drawing.default_font_size, 64.0);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.overlay.magnifier_zoom, 2.0);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[drawing\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn rgb_color_round_trips_through_toml() {
        let config = Config::from_toml_str("[drawing]\ndefault_color = [0, 128, 255]\n").unwrap();
        assert_eq!(config.drawing.default_color, ColorSpec::Rgb([0, 128, 255]));
        let text = config.to_toml_string().unwrap();
        let again = Config::from_toml_str(&text).unwrap();
        assert_eq!(again.drawing.default_color, ColorSpec::Rgb([0, 128, 255]));
    }

    #[test]
    fn schema_mentions_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        assert!(schema.contains("history_limit"));
        assert!(schema.contains("keybindings"));
    }
}
