//! Keybinding configuration types and parsing.
//!
//! This module defines the configurable keybinding system that allows users
//! to customize keyboard shortcuts for all actions in the application.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Exit and cancellation
    Exit,

    // History and canvas
    Undo,
    Redo,
    ClearCanvas,
    ExportPng,

    // Size controls
    IncreaseThickness,
    DecreaseThickness,
    IncreaseFontSize,
    DecreaseFontSize,

    // Tool selection
    SelectTool,
    BrushTool,
    EraserTool,
    TextTool,
    LineTool,
    ArrowTool,
    RectangleTool,
    EllipseTool,
    RoundedRectangleTool,
    StarTool,
    MagnifierTool,
    HighlighterTool,
    LaserPointerTool,

    // Color selections
    SetColorRed,
    SetColorGreen,
    SetColorBlue,
    SetColorYellow,
    SetColorOrange,
    SetColorPink,
    SetColorWhite,
    SetColorBlack,
}

/// A single keybinding: a key with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+Z" or "Escape".
    /// Modifiers can appear in any order and spaces around '+' are ignored.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl+Shift++" splits into [.., "", ""]; the key is '+' itself.
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings. Users specify them in config.toml as:
/// ```toml
/// [keybindings]
/// exit = ["Escape", "Ctrl+Q"]
/// undo = ["Ctrl+Z"]
/// redo = ["Ctrl+Y", "Ctrl+Shift+Z"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_exit")]
    pub exit: Vec<String>,

    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_redo")]
    pub redo: Vec<String>,

    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_export_png")]
    pub export_png: Vec<String>,

    #[serde(default = "default_increase_thickness")]
    pub increase_thickness: Vec<String>,

    #[serde(default = "default_decrease_thickness")]
    pub decrease_thickness: Vec<String>,

    #[serde(default = "default_increase_font_size")]
    pub increase_font_size: Vec<String>,

    #[serde(default = "default_decrease_font_size")]
    pub decrease_font_size: Vec<String>,

    #[serde(default = "default_select_tool")]
    pub select_tool: Vec<String>,

    #[serde(default = "default_brush_tool")]
    pub brush_tool: Vec<String>,

    #[serde(default = "default_eraser_tool")]
    pub eraser_tool: Vec<String>,

    #[serde(default = "default_text_tool")]
    pub text_tool: Vec<String>,

    #[serde(default = "default_line_tool")]
    pub line_tool: Vec<String>,

    #[serde(default = "default_arrow_tool")]
    pub arrow_tool: Vec<String>,

    #[serde(default = "default_rectangle_tool")]
    pub rectangle_tool: Vec<String>,

    #[serde(default = "default_ellipse_tool")]
    pub ellipse_tool: Vec<String>,

    #[serde(default = "default_rounded_rectangle_tool")]
    pub rounded_rectangle_tool: Vec<String>,

    #[serde(default = "default_star_tool")]
    pub star_tool: Vec<String>,

    #[serde(default = "default_magnifier_tool")]
    pub magnifier_tool: Vec<String>,

    #[serde(default = "default_highlighter_tool")]
    pub highlighter_tool: Vec<String>,

    #[serde(default = "default_laser_pointer_tool")]
    pub laser_pointer_tool: Vec<String>,

    #[serde(default = "default_set_color_red")]
    pub set_color_red: Vec<String>,

    #[serde(default = "default_set_color_green")]
    pub set_color_green: Vec<String>,

    #[serde(default = "default_set_color_blue")]
    pub set_color_blue: Vec<String>,

    #[serde(default = "default_set_color_yellow")]
    pub set_color_yellow: Vec<String>,

    #[serde(default = "default_set_color_orange")]
    pub set_color_orange: Vec<String>,

    #[serde(default = "default_set_color_pink")]
    pub set_color_pink: Vec<String>,

    #[serde(default = "default_set_color_white")]
    pub set_color_white: Vec<String>,

    #[serde(default = "default_set_color_black")]
    pub set_color_black: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            exit: default_exit(),
            undo: default_undo(),
            redo: default_redo(),
            clear_canvas: default_clear_canvas(),
            export_png: default_export_png(),
            increase_thickness: default_increase_thickness(),
            decrease_thickness: default_decrease_thickness(),
            increase_font_size: default_increase_font_size(),
            decrease_font_size: default_decrease_font_size(),
            select_tool: default_select_tool(),
            brush_tool: default_brush_tool(),
            eraser_tool: default_eraser_tool(),
            text_tool: default_text_tool(),
            line_tool: default_line_tool(),
            arrow_tool: default_arrow_tool(),
            rectangle_tool: default_rectangle_tool(),
            ellipse_tool: default_ellipse_tool(),
            rounded_rectangle_tool: default_rounded_rectangle_tool(),
            star_tool: default_star_tool(),
            magnifier_tool: default_magnifier_tool(),
            highlighter_tool: default_highlighter_tool(),
            laser_pointer_tool: default_laser_pointer_tool(),
            set_color_red: default_set_color_red(),
            set_color_green: default_set_color_green(),
            set_color_blue: default_set_color_blue(),
            set_color_yellow: default_set_color_yellow(),
            set_color_orange: default_set_color_orange(),
            set_color_pink: default_set_color_pink(),
            set_color_white: default_set_color_white(),
            set_color_black: default_set_color_black(),
        }
    }
}

impl KeybindingsConfig {
    fn bindings(&self) -> [(&Vec<String>, Action); 30] {
        [
            (&self.exit, Action::Exit),
            (&self.undo, Action::Undo),
            (&self.redo, Action::Redo),
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.export_png, Action::ExportPng),
            (&self.increase_thickness, Action::IncreaseThickness),
            (&self.decrease_thickness, Action::DecreaseThickness),
            (&self.increase_font_size, Action::IncreaseFontSize),
            (&self.decrease_font_size, Action::DecreaseFontSize),
            (&self.select_tool, Action::SelectTool),
            (&self.brush_tool, Action::BrushTool),
            (&self.eraser_tool, Action::EraserTool),
            (&self.text_tool, Action::TextTool),
            (&self.line_tool, Action::LineTool),
            (&self.arrow_tool, Action::ArrowTool),
            (&self.rectangle_tool, Action::RectangleTool),
            (&self.ellipse_tool, Action::EllipseTool),
            (&self.rounded_rectangle_tool, Action::RoundedRectangleTool),
            (&self.star_tool, Action::StarTool),
            (&self.magnifier_tool, Action::MagnifierTool),
            (&self.highlighter_tool, Action::HighlighterTool),
            (&self.laser_pointer_tool, Action::LaserPointerTool),
            (&self.set_color_red, Action::SetColorRed),
            (&self.set_color_green, Action::SetColorGreen),
            (&self.set_color_blue, Action::SetColorBlue),
            (&self.set_color_yellow, Action::SetColorYellow),
            (&self.set_color_orange, Action::SetColorOrange),
            (&self.set_color_pink, Action::SetColorPink),
            (&self.set_color_white, Action::SetColorWhite),
            (&self.set_color_black, Action::SetColorBlack),
        ]
    }

    /// Build a lookup map from keybindings to actions for efficient matching.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        for (binding_strs, action) in self.bindings() {
            for binding_str in binding_strs {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|key| key.to_string()).collect()
}

fn default_exit() -> Vec<String> {
    keys(&["Escape", "Ctrl+Q"])
}

fn default_undo() -> Vec<String> {
    keys(&["Ctrl+Z"])
}

fn default_redo() -> Vec<String> {
    keys(&["Ctrl+Y", "Ctrl+Shift+Z"])
}

fn default_clear_canvas() -> Vec<String> {
    keys(&["E"])
}

fn default_export_png() -> Vec<String> {
    keys(&["Ctrl+S"])
}

fn default_increase_thickness() -> Vec<String> {
    keys(&["+", "="])
}

fn default_decrease_thickness() -> Vec<String> {
    keys(&["-", "_"])
}

fn default_increase_font_size() -> Vec<String> {
    keys(&["Ctrl+Shift++", "Ctrl+Shift+="])
}

fn default_decrease_font_size() -> Vec<String> {
    keys(&["Ctrl+Shift+-", "Ctrl+Shift+_"])
}

fn default_select_tool() -> Vec<String> {
    keys(&["S"])
}

fn default_brush_tool() -> Vec<String> {
    keys(&["P"])
}

fn default_eraser_tool() -> Vec<String> {
    keys(&["X"])
}

fn default_text_tool() -> Vec<String> {
    keys(&["T"])
}

fn default_line_tool() -> Vec<String> {
    keys(&["1"])
}

fn default_arrow_tool() -> Vec<String> {
    keys(&["2"])
}

fn default_rectangle_tool() -> Vec<String> {
    keys(&["3"])
}

fn default_ellipse_tool() -> Vec<String> {
    keys(&["4"])
}

fn default_rounded_rectangle_tool() -> Vec<String> {
    keys(&["5"])
}

fn default_star_tool() -> Vec<String> {
    keys(&["6"])
}

fn default_magnifier_tool() -> Vec<String> {
    keys(&["M"])
}

fn default_highlighter_tool() -> Vec<String> {
    keys(&["H"])
}

fn default_laser_pointer_tool() -> Vec<String> {
    keys(&["L"])
}

fn default_set_color_red() -> Vec<String> {
    keys(&["R"])
}

fn default_set_color_green() -> Vec<String> {
    keys(&["G"])
}

fn default_set_color_blue() -> Vec<String> {
    keys(&["B"])
}

fn default_set_color_yellow() -> Vec<String> {
    keys(&["Y"])
}

fn default_set_color_orange() -> Vec<String> {
    keys(&["O"])
}

fn default_set_color_pink() -> Vec<String> {
    keys(&["Shift+P"])
}

fn default_set_color_white() -> Vec<String> {
    keys(&["W"])
}

fn default_set_color_black() -> Vec<String> {
    keys(&["K"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert_eq!(binding.key, "Escape");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_ctrl_shift_key() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(binding.key, "Z");
        assert!(binding.ctrl);
        assert!(binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = KeyBinding::parse("Ctrl+Shift++").unwrap();
        assert_eq!(binding.key, "+");
        assert!(binding.ctrl && binding.shift);

        let bare = KeyBinding::parse("+").unwrap();
        assert_eq!(bare.key, "+");
        assert!(!bare.ctrl && !bare.shift);
    }

    #[test]
    fn test_parse_with_spaces_and_any_order() {
        let a = KeyBinding::parse("Ctrl + Shift + W").unwrap();
        let b = KeyBinding::parse("Shift+Ctrl+W").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(KeyBinding::parse("  ").is_err());
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
    }

    #[test]
    fn test_matches() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert!(binding.matches("Z", true, true, false));
        assert!(binding.matches("z", true, true, false));
        assert!(!binding.matches("Z", false, true, false));
        assert!(!binding.matches("Z", true, false, false));
    }

    #[test]
    fn test_build_action_map() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let escape = KeyBinding::parse("Escape").unwrap();
        assert_eq!(map.get(&escape), Some(&Action::Exit));

        let redo = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(map.get(&redo), Some(&Action::Redo));

        let pink = KeyBinding::parse("Shift+P").unwrap();
        let brush = KeyBinding::parse("P").unwrap();
        assert_eq!(map.get(&pink), Some(&Action::SetColorPink));
        assert_eq!(map.get(&brush), Some(&Action::BrushTool));
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let config = KeybindingsConfig {
            exit: vec!["Ctrl+Z".to_string()],
            ..KeybindingsConfig::default()
        };

        let err_msg = config.build_action_map().unwrap_err();
        assert!(err_msg.contains("Duplicate keybinding"));
        assert!(err_msg.contains("Ctrl+Z"));
    }
}
