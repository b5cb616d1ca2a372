//! Theme tokens: a token name → hex colour map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token used for the navigation background.
pub const BACKGROUND_TOKEN: &str = "white_snow";

/// Background used when the theme has no `white_snow` token.
pub const DEFAULT_BACKGROUND: &str = "#FCFCFC";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

const LIGHT_PALETTE: &[(&str, &str)] = &[
    ("accent_blue", "#005FFF"),
    ("accent_red", "#FF3742"),
    ("black", "#000000"),
    ("blue_alice", "#E9F2FF"),
    ("grey", "#7A7A7A"),
    ("grey_gainsboro", "#DBDBDB"),
    ("white", "#FFFFFF"),
    ("white_snow", "#FCFCFC"),
];

const DARK_PALETTE: &[(&str, &str)] = &[
    ("accent_blue", "#4E8BFF"),
    ("accent_red", "#FF3742"),
    ("black", "#FFFFFF"),
    ("blue_alice", "#00193D"),
    ("grey", "#7A7A7A"),
    ("grey_gainsboro", "#2D2F2F"),
    ("white", "#101418"),
    ("white_snow", "#070A0D"),
];

/// Token → colour mapping supplied to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTokens {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl ThemeTokens {
    /// Built-in palette for `scheme`.
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        let palette = match scheme {
            ColorScheme::Light => LIGHT_PALETTE,
            ColorScheme::Dark => DARK_PALETTE,
        };
        Self {
            colors: palette
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Overlay `overrides` on top of these tokens.
    pub fn merged(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (token, value) in overrides {
            self.colors.insert(token.clone(), value.clone());
        }
        self
    }

    pub fn color(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(String::as_str)
    }

    /// Background colour, falling back to [`DEFAULT_BACKGROUND`].
    pub fn background(&self) -> &str {
        self.color(BACKGROUND_TOKEN).unwrap_or(DEFAULT_BACKGROUND)
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`) into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
