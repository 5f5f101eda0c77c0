use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ColorParseError;

/// Gradient blob color: one of the built-in palette entries or a custom hex.
///
/// Built-ins encode as a bare string tag (`"blue"`), custom colors as
/// `{"custom": "RRGGBB"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Pink,
    Purple,
    Teal,
    Indigo,
    Custom(HexColor),
}

/// Every built-in color, in palette order. Random generation draws from here.
pub const BUILTIN_COLORS: [Color; 9] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Orange,
    Color::Red,
    Color::Pink,
    Color::Purple,
    Color::Teal,
    Color::Indigo,
];

impl Color {
    /// Draw one built-in color uniformly.
    pub fn random_builtin(rng: &mut fastrand::Rng) -> Self {
        BUILTIN_COLORS[rng.usize(..BUILTIN_COLORS.len())].clone()
    }

    /// Draw `count` built-in colors uniformly, with replacement.
    pub fn random_builtins(rng: &mut fastrand::Rng, count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::random_builtin(rng)).collect()
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Color::Custom(_))
    }

    /// Display name; custom colors report their hex payload.
    pub fn name(&self) -> &str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Teal => "teal",
            Color::Indigo => "indigo",
            Color::Custom(hex) => hex.as_str(),
        }
    }

    /// RGBA components for renderers.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            Color::Blue => [0, 122, 255, 255],
            Color::Green => [52, 199, 89, 255],
            Color::Yellow => [255, 204, 0, 255],
            Color::Orange => [255, 149, 0, 255],
            Color::Red => [255, 59, 48, 255],
            Color::Pink => [255, 45, 85, 255],
            Color::Purple => [175, 82, 222, 255],
            Color::Teal => [48, 176, 199, 255],
            Color::Indigo => [88, 86, 214, 255],
            Color::Custom(hex) => hex.rgba(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Custom(hex) => write!(f, "#{hex}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts a built-in name (case-insensitive) or a hex color.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(builtin) = BUILTIN_COLORS
            .iter()
            .find(|color| color.name().eq_ignore_ascii_case(trimmed))
        {
            return Ok(builtin.clone());
        }

        HexColor::parse(trimmed)
            .map(Color::Custom)
            .ok_or_else(|| ColorParseError(s.to_string()))
    }
}

/// Validated `RRGGBB` or `RRGGBBAA` hex string, stored uppercase without `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Accepts an optional leading `#` and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !matches!(digits.len(), 6 | 8)
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }

        Some(Self(digits.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_alpha(&self) -> bool {
        self.0.len() == 8
    }

    pub fn rgba(&self) -> [u8; 4] {
        let channel = |index: usize| {
            self.0
                .get(index * 2..index * 2 + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .unwrap_or(u8::MAX)
        };

        let alpha = if self.has_alpha() { channel(3) } else { u8::MAX };
        [channel(0), channel(1), channel(2), alpha]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ColorParseError(value))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}
