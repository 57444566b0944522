//! Generic input event types consumed by the annotation engine.

use crate::util::Point;
use serde::{Deserialize, Serialize};

/// Generic key representation.
///
/// Platform adapters map their native key codes to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key
    Escape,
    /// Return/Enter key
    Return,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Space bar
    Space,
    /// Shift modifier
    Shift,
    /// Ctrl modifier
    Ctrl,
    /// Alt modifier
    Alt,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Parses a key name as used in event scripts ("a", "Escape", "Return", ...).
    pub fn from_name(name: &str) -> Key {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "Return" | "Enter" => Key::Return,
            "Backspace" => Key::Backspace,
            "Tab" => Key::Tab,
            "Space" => Key::Space,
            "Shift" => Key::Shift,
            "Ctrl" | "Control" => Key::Ctrl,
            "Alt" => Key::Alt,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unknown,
                }
            }
        }
    }
}

/// Where a pointer event falls within a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the surface; finishes a gesture like `Up`
    Leave,
}

/// One pointer sample in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, phase: PointerPhase) -> Self {
        Self {
            position: Point::new(x, y),
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_parse() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Return);
        assert_eq!(Key::from_name("x"), Key::Char('x'));
        assert_eq!(Key::from_name("F13"), Key::Unknown);
    }
}
