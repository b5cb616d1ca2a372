//! Color theme for the chat UI.
//!
//! Screen colours come from the configured [`ThemeTokens`]; the constants
//! below cover chrome that does not change with the scheme.

use ratatui::style::Color;

use crate::models::theme::parse_hex_color;
use crate::models::ThemeTokens;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Error text on the status line and fatal panel
pub const COLOR_ERROR: Color = Color::Red;

/// Selection marker and highlighted rows
pub const COLOR_ACCENT: Color = Color::Rgb(0, 95, 255); // blue #005FFF

/// Convert a `#RRGGBB` string to a terminal colour.
pub fn hex_to_color(value: &str) -> Option<Color> {
    parse_hex_color(value).map(|(r, g, b)| Color::Rgb(r, g, b))
}

/// Resolved colours for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
}

impl Palette {
    /// Look up the tokens the screens use, falling back to terminal colours.
    pub fn from_tokens(tokens: &ThemeTokens) -> Self {
        let pick = |token: &str, fallback: Color| {
            tokens
                .color(token)
                .and_then(hex_to_color)
                .unwrap_or(fallback)
        };
        Self {
            background: hex_to_color(tokens.background()).unwrap_or(Color::Reset),
            text: pick("black", Color::Reset),
            dim: pick("grey", COLOR_DIM),
            accent: pick("accent_blue", COLOR_ACCENT),
            border: pick("grey_gainsboro", COLOR_DIM),
            error: pick("accent_red", COLOR_ERROR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorScheme;
    use std::collections::BTreeMap;

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#FCFCFC"), Some(Color::Rgb(252, 252, 252)));
        assert_eq!(hex_to_color("white"), None);
    }

    #[test]
    fn test_palette_uses_background_fallback() {
        let palette = Palette::from_tokens(&ThemeTokens::default());
        assert_eq!(palette.background, Color::Rgb(252, 252, 252));
        assert_eq!(palette.dim, COLOR_DIM);
    }

    #[test]
    fn test_palette_reads_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("accent_blue".to_string(), "#112233".to_string());
        let tokens = ThemeTokens::for_scheme(ColorScheme::Dark).merged(&overrides);
        let palette = Palette::from_tokens(&tokens);
        assert_eq!(palette.accent, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(palette.background, Color::Rgb(7, 10, 13));
    }
}
