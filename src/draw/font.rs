//! Font descriptor for text rendering.

use serde::{Deserialize, Serialize};

/// Font configuration for text annotations.
///
/// Carried by every committed text object so a later re-render uses the same
/// face the user saw while typing, even if the configuration changed since.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "normal".to_string(),
            style: "normal".to_string(),
        }
    }
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Converts this descriptor to a Pango description string without a size.
    ///
    /// Format: "Family Style Weight", e.g. "Sans Bold" or "Monospace Italic".
    pub fn to_pango_string(&self) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.style.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.style));
        }

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.join(" ")
    }

    /// Builds a Pango font description sized in device pixels.
    ///
    /// Annotation font sizes are pixel heights (16..64), so the absolute size is
    /// used instead of points to keep line spacing tied to `size`.
    pub fn to_font_description(&self, size: f64) -> pango::FontDescription {
        let mut desc = pango::FontDescription::from_string(&self.to_pango_string());
        desc.set_absolute_size(size * pango::SCALE as f64);
        desc
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pango_string_default_is_family_only() {
        let font = FontDescriptor::default();
        assert_eq!(font.to_pango_string(), "Sans");
    }

    #[test]
    fn pango_string_includes_style_and_weight() {
        let font = FontDescriptor::new(
            "JetBrains Mono".to_string(),
            "bold".to_string(),
            "italic".to_string(),
        );
        assert_eq!(font.to_pango_string(), "JetBrains Mono Italic Bold");
    }

    #[test]
    fn font_description_uses_pixel_size() {
        let font = FontDescriptor::default();
        let desc = font.to_font_description(24.0);
        assert!(desc.is_size_absolute());
        assert_eq!(desc.size(), 24 * pango::SCALE);
    }
}
