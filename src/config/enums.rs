//! Configuration enum types.

use crate::draw::Color;
use crate::draw::color::{name_to_color, parse_color};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// stroke_color = "red"
///
/// # Hex string, optionally with alpha first (#AARRGGBB)
/// stroke_color = "#FF8000"
///
/// # Custom RGB color (0-255 per component)
/// stroke_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black, gray,
    /// transparent) or a `#RRGGBB` / `#AARRGGBB` hex string
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    pub fn named(name: &str) -> Self {
        ColorSpec::Name(name.to_string())
    }

    /// Resolves the specification, or `None` for an unknown name.
    pub fn to_color(&self) -> Option<Color> {
        match self {
            ColorSpec::Name(name) if name.trim_start().starts_with('#') => parse_color(name),
            ColorSpec::Name(name) => name_to_color(name.trim()),
            ColorSpec::Rgb([r, g, b]) => Some(Color::rgb(*r, *g, *b)),
        }
    }
}

/// Compression preference for scene files.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageCompression {
    /// Always write plain text
    #[default]
    Off,
    /// Always write gzip-compressed text
    On,
    /// Compress when the payload exceeds `auto_compress_threshold_kb`
    Auto,
}
